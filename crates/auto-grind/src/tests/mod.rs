mod app;
mod config;
mod recording_file;
