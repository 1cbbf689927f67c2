// firstblood: announce CTF first bloods from CTFd on Discord.
//
// This is the library root. Each module corresponds to one collaborator
// of the announcement loop.

pub mod config;
pub mod ctfd;
pub mod db;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod preflight;
