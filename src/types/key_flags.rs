//! # Key Flags
//!
//! Constraint metadata carried next to every value. Rendered in this fixed
//! order by `TypedValue::declared_type_text(true)`:
//!
//! ```text
//! PRIMARY KEY  UNIQUE  AUTO INCREMENT  NOT NULL  DEFAULT <literal>
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyFlags(u8);

impl KeyFlags {
    pub const NORMAL: KeyFlags = KeyFlags(0);
    pub const PRIMARY_KEY: KeyFlags = KeyFlags(0x01);
    pub const UNIQUE: KeyFlags = KeyFlags(0x02);
    pub const AUTO_INCREMENT: KeyFlags = KeyFlags(0x04);
    pub const NOT_NULL: KeyFlags = KeyFlags(0x08);
    pub const HAS_DEFAULT: KeyFlags = KeyFlags(0x10);

    pub const fn contains(&self, other: KeyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_primary_key(&self) -> bool {
        self.contains(Self::PRIMARY_KEY)
    }

    pub const fn has_default(&self) -> bool {
        self.contains(Self::HAS_DEFAULT)
    }

    pub fn insert(&mut self, other: KeyFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: KeyFlags) {
        self.0 &= !other.0;
    }

    pub const fn is_normal(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for KeyFlags {
    type Output = KeyFlags;

    fn bitor(self, rhs: KeyFlags) -> KeyFlags {
        KeyFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for KeyFlags {
    fn bitor_assign(&mut self, rhs: KeyFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for KeyFlags {
    type Output = KeyFlags;

    fn bitand(self, rhs: KeyFlags) -> KeyFlags {
        KeyFlags(self.0 & rhs.0)
    }
}

impl fmt::Debug for KeyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_normal() {
            return write!(f, "KeyFlags(NORMAL)");
        }
        let names = [
            (Self::PRIMARY_KEY, "PRIMARY_KEY"),
            (Self::UNIQUE, "UNIQUE"),
            (Self::AUTO_INCREMENT, "AUTO_INCREMENT"),
            (Self::NOT_NULL, "NOT_NULL"),
            (Self::HAS_DEFAULT, "HAS_DEFAULT"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "KeyFlags({})", set.join(" | "))
    }
}
