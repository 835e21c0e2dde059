pub mod shell;

pub use shell::spa_shell;
