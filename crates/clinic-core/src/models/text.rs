//! Fixed-width text fields and name normalization.

/// Byte widths of the fixed text buffers, terminating NUL included.
pub const NAME_WIDTH: usize = 50;
pub const PHONE_WIDTH: usize = 15;
pub const EMAIL_WIDTH: usize = 50;
pub const ADDRESS_WIDTH: usize = 100;
pub const SPECIALIZATION_WIDTH: usize = 30;
pub const BLOOD_GROUP_WIDTH: usize = 5;
pub const USERNAME_WIDTH: usize = 30;
pub const PASSWORD_WIDTH: usize = 50;
pub const DATE_WIDTH: usize = 15;
pub const TIME_SLOT_WIDTH: usize = 10;
pub const REASON_WIDTH: usize = 100;

/// A text value paired with the buffer it has to fit in.
#[derive(Debug, Clone, Copy)]
pub struct TextField<'a> {
    pub name: &'static str,
    pub bytes: &'a [u8],
    pub width: usize,
}

impl<'a> TextField<'a> {
    pub fn new(name: &'static str, value: &'a str, width: usize) -> Self {
        Self::raw(name, value.as_bytes(), width)
    }

    pub fn raw(name: &'static str, bytes: &'a [u8], width: usize) -> Self {
        Self { name, bytes, width }
    }

    /// Leaves room for the terminating NUL.
    pub fn fits(&self) -> bool {
        self.bytes.len() < self.width
    }

    pub fn contains_nul(&self) -> bool {
        self.bytes.contains(&0)
    }
}

/// Canonical form of a person's name: trimmed, single-spaced, each word
/// capitalized.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-normalized name equality used by name lookups.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}
