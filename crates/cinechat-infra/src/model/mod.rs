//! On-device model installation.

pub mod installer;

pub use installer::FsModelInstaller;
