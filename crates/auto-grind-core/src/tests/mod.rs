mod capture;
mod chord;
mod event;
mod support;
