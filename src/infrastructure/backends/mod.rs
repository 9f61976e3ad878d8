pub mod clompanion;
