pub mod keys;
pub mod keysym;
pub mod modifier;
pub mod pump;
pub mod source;
pub mod touch;
