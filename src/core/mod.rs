pub mod config;
pub mod dice;
pub mod fertility;
pub mod genealogist;
pub mod generation;
pub mod marriage;
pub mod names;
pub mod partnership_factory;
pub mod person_factory;
pub mod report;
pub mod rows;
