/// Duplicates overheard before a pending packet is abandoned.
pub const MAX_DUPS: u8 = 2;
