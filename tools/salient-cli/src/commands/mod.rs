pub mod profile;
pub mod replay;
pub mod simulate;
pub mod validate;
