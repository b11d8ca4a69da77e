pub mod cli;
pub mod config;
pub mod github;
pub mod output;
pub mod report;
pub mod run;
pub mod scanner;
