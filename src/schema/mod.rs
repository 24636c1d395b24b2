pub mod partnership;
pub mod person;
pub mod tree;
