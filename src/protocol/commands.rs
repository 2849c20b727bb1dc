use paste::paste;

use crate::protocol::packet::PacketBuf;

/// Common imports used by most packet parsers.
///
/// Do not clutter this prelude with types only used by a few packets.
pub(self) mod prelude {
    pub use crate::protocol::commands::ParseCommand;
    pub use crate::protocol::common::hex::{decode_hex, decode_hex_buf};
    pub use crate::protocol::packet::PacketBuf;
}

pub trait ParseCommand<'a>: Sized {
    /// Try to parse a packet from the packet buffer.
    fn from_packet(buf: PacketBuf<'a>) -> Option<Self>;
}

pub mod breakpoint;

macro_rules! commands {
    (
        $(
            $ext:ident $(use $lt:lifetime)? {
                $($name:literal => $mod:ident::$command:ident$(<$lifetime:lifetime>)?,)*
            }
        )*
    ) => {paste! {
        $($(
            #[allow(non_snake_case, non_camel_case_types)]
            pub mod $mod;
        )*)*

        pub mod ext {
            $(
                #[allow(non_camel_case_types, clippy::enum_variant_names)]
                pub enum [<$ext:camel>] $(<$lt>)? {
                    $($command(super::$mod::$command $(<$lifetime>)?),)*
                }
            )*
        }

        /// GDB commands, grouped by the handler module that services them.
        ///
        /// Commands are matched by longest prefix in declaration order; the
        /// sub-token after `q` is part of the prefix, so the query namespace
        /// needs no second dispatch level. Anything unmatched becomes
        /// `Unknown` and is answered with the empty packet.
        pub enum Command<'a> {
            $(
                [<$ext:camel>](ext::[<$ext:camel>] $(<$lt>)?),
            )*
            Unknown(&'a [u8]),
        }

        impl<'a> Command<'a> {
            pub fn from_packet(mut buf: PacketBuf<'a>) -> Option<Command<'a>> {
                $($(
                if buf.strip_prefix($name.as_bytes()) {
                    let cmd = $mod::$command::from_packet(buf)?;
                    return Some(Command::[<$ext:camel>](ext::[<$ext:camel>]::$command(cmd)));
                }
                )*)*

                Some(Command::Unknown(buf.into_body()))
            }
        }
    }};
}

commands! {
    base use 'a {
        "?" => question_mark::QuestionMark,
        "D" => _d_upcase::D,
        "g" => _g::g,
        "G" => _g_upcase::G<'a>,
        "H" => _h_upcase::H,
        "k" => _k::k,
        "m" => _m::m,
        "M" => _m_upcase::M<'a>,
        "qAttached" => _qAttached::qAttached,
        "qC" => _qC::qC,
        "qfThreadInfo" => _qfThreadInfo::qfThreadInfo,
        "qsThreadInfo" => _qsThreadInfo::qsThreadInfo,
        "X" => _x_upcase::X<'a>,
    }

    resume use 'a {
        "c" => _c::c,
        "s" => _s::s,
        "vCont?" => vCont_question_mark::vContQuestionMark,
        "vCont" => _vCont::vCont<'a>,
    }

    breakpoints {
        "z" => _z::z,
        "Z" => _z_upcase::Z,
    }

    target_xml use 'a {
        "qSupported" => _qSupported::qSupported<'a>,
        "qXfer:features:read:" => _qXfer_features_read::qXferFeaturesRead<'a>,
    }
}
