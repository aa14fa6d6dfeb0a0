pub mod interrupt;
pub mod overrides;
pub mod select;
