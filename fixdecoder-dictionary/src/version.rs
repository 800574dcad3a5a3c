//! Protocol versions and the keys dictionaries are cached under.

use std::{fmt, str::FromStr};

use crate::xml::FixType;

/// Represents a specific version of the FIX protocol.
///
/// FIX versions are identified by a type (FIX or FIXT), major version,
/// minor version, and service pack level. The [`key`](Version::key) of a
/// version (e.g. `FIX44`, `FIX50SP2`, `FIXT11`) is what dictionaries are
/// cached under.
///
/// Versions outside [`known_versions`](Version::known_versions) can be
/// represented, they simply have no embedded dictionary.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version {
    fix_type: FixType,
    major: u8,
    minor: u8,
    servicepack: u8,
}

impl Version {
    pub const FIX27: Version = Version::fix(2, 7, 0);
    pub const FIX30: Version = Version::fix(3, 0, 0);
    pub const FIX40: Version = Version::fix(4, 0, 0);
    pub const FIX41: Version = Version::fix(4, 1, 0);
    pub const FIX42: Version = Version::fix(4, 2, 0);
    pub const FIX43: Version = Version::fix(4, 3, 0);
    pub const FIX44: Version = Version::fix(4, 4, 0);
    pub const FIX50: Version = Version::fix(5, 0, 0);
    pub const FIX50SP1: Version = Version::fix(5, 0, 1);
    pub const FIX50SP2: Version = Version::fix(5, 0, 2);
    pub const FIXT11: Version = Version {
        fix_type: FixType::Fixt,
        major: 1,
        minor: 1,
        servicepack: 0,
    };

    /// The version assumed when a message does not say which one it uses.
    pub const DEFAULT: Version = Version::FIX44;

    const fn fix(major: u8, minor: u8, servicepack: u8) -> Version {
        Version {
            fix_type: FixType::Fix,
            major,
            minor,
            servicepack,
        }
    }

    /// Returns a slice containing all known standard FIX protocol versions
    pub const fn known_versions() -> &'static [Version] {
        &[
            Version::FIX27,
            Version::FIX30,
            Version::FIX40,
            Version::FIX41,
            Version::FIX42,
            Version::FIX43,
            Version::FIX44,
            Version::FIX50,
            Version::FIX50SP1,
            Version::FIX50SP2,
            Version::FIXT11,
        ]
    }

    /// Maps an `ApplVerID(1128)` code onto the application version.
    ///
    /// Unrecognised codes map to FIX 5.0, the first version carried over
    /// FIXT.
    pub fn from_appl_ver_id(code: &str) -> Version {
        match code {
            "0" => Version::FIX27,
            "1" => Version::FIX30,
            "2" => Version::FIX40,
            "3" => Version::FIX41,
            "4" => Version::FIX42,
            "5" => Version::FIX43,
            "6" => Version::FIX44,
            "7" => Version::FIX50,
            "8" => Version::FIX50SP1,
            "9" => Version::FIX50SP2,
            _ => Version::FIX50,
        }
    }

    /// Returns true if this version is one of the standard ones
    pub fn is_known(&self) -> bool {
        Version::known_versions().contains(self)
    }

    /// Returns the type of this FIX version (FIX or FIXT)
    pub const fn fix_type(&self) -> FixType {
        self.fix_type
    }

    /// Returns true if this is a FIXT protocol version
    pub const fn is_fixt(&self) -> bool {
        matches!(self.fix_type, FixType::Fixt)
    }

    pub const fn major(&self) -> u8 {
        self.major
    }

    pub const fn minor(&self) -> u8 {
        self.minor
    }

    pub const fn servicepack(&self) -> u8 {
        self.servicepack
    }

    /// Returns true for application versions whose session layer is defined
    /// by the FIXT 1.1 dictionary (FIX 5.0 and later).
    pub const fn uses_transport_dictionary(&self) -> bool {
        matches!(self.fix_type, FixType::Fix) && self.major >= 5
    }

    /// Returns the BeginString representation of this version
    ///
    /// Formats the version as it appears in FIX messages (e.g., "FIX.4.4",
    /// "FIXT.1.1", "FIX.5.0SP2").
    pub fn begin_string(&self) -> String {
        if self.servicepack == 0 {
            format!("{}.{}.{}", self.fix_type, self.major, self.minor)
        } else {
            format!(
                "{}.{}.{}SP{}",
                self.fix_type, self.major, self.minor, self.servicepack
            )
        }
    }

    /// Returns the cache key of this version, the begin string without
    /// separator punctuation (e.g. "FIX44", "FIX50SP2", "FIXT11").
    pub fn key(&self) -> String {
        self.begin_string().replace('.', "")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Error returned when a string is neither a begin string nor a version key.
#[derive(Debug, thiserror::Error)]
#[error("Unrecognised FIX version: {0}")]
pub struct ParseVersionError(String);

fn parse_number(s: &str, input: &str) -> Result<u8, ParseVersionError> {
    s.parse::<u8>()
        .map_err(|_| ParseVersionError(input.to_owned()))
}

impl FromStr for Version {
    type Err = ParseVersionError;

    /// Parse a BeginString value or a version key into a Version
    ///
    /// Accepts strings in the format:
    /// - "FIX.MAJOR.MINOR" (e.g., "FIX.4.4")
    /// - "FIXT.MAJOR.MINOR" (e.g., "FIXT.1.1")
    /// - "FIX.MAJOR.MINORSPx" (e.g., "FIX.5.0SP2")
    /// - the same without dots, as produced by [`Version::key`]
    ///   (e.g., "FIX44", "FIX50SP2")
    ///
    /// # Examples
    ///
    /// ```
    /// use fixdecoder_dictionary::Version;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(Version::from_str("FIX.4.4").unwrap(), Version::FIX44);
    /// assert_eq!(Version::from_str("FIXT.1.1").unwrap(), Version::FIXT11);
    /// assert_eq!(Version::from_str("FIX50SP2").unwrap(), Version::FIX50SP2);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (fix_type, rest) = if let Some(rest) = s.strip_prefix("FIXT") {
            (FixType::Fixt, rest)
        } else if let Some(rest) = s.strip_prefix("FIX") {
            (FixType::Fix, rest)
        } else {
            return Err(ParseVersionError(s.to_owned()));
        };

        let (numbers, servicepack) = match rest.find("SP") {
            Some(sp_pos) => (&rest[..sp_pos], parse_number(&rest[sp_pos + 2..], s)?),
            None => (rest, 0),
        };

        let (major, minor) = if numbers.contains('.') {
            // Dotted form: ".4.4"
            let parts: Vec<&str> = numbers.split('.').collect();
            match parts.as_slice() {
                ["", major, minor] => (parse_number(major, s)?, parse_number(minor, s)?),
                _ => return Err(ParseVersionError(s.to_owned())),
            }
        } else {
            // Key form: "44", one digit each
            let mut digits = numbers.chars();
            match (digits.next(), digits.next(), digits.next()) {
                (Some(major), Some(minor), None) => (
                    major
                        .to_digit(10)
                        .ok_or_else(|| ParseVersionError(s.to_owned()))? as u8,
                    minor
                        .to_digit(10)
                        .ok_or_else(|| ParseVersionError(s.to_owned()))? as u8,
                ),
                _ => return Err(ParseVersionError(s.to_owned())),
            }
        };

        Ok(Version {
            fix_type,
            major,
            minor,
            servicepack,
        })
    }
}
