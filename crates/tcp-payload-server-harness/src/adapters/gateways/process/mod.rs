mod launcher;

pub use launcher::CommandLauncher;
