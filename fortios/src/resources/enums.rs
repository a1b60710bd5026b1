//! Closed sets of string values accepted by resource attributes

use std::str::FromStr;

/// A value that is written to Terraform and the device as one of a fixed set of strings
pub trait StringEnum: FromStr + Copy + Send + Sync + 'static {
    const VALUES: &'static [&'static str];

    fn as_str(&self) -> &'static str;
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::resources::enums::StringEnum for $name {
            const VALUES: &'static [&'static str] = &[$($value),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(other.to_string()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::resources::enums::StringEnum::as_str(self))
            }
        }
    };
}

pub(crate) use string_enum;

string_enum! {
    /// `enable` / `disable` switches
    pub enum Toggle {
        Enable => "enable",
        Disable => "disable",
    }
}
