mod fake_launcher;
mod manager;

pub(crate) use fake_launcher::{FakeLaunch, FakeLauncher};
