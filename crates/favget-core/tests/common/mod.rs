#![allow(dead_code)]

pub mod icon_server;
