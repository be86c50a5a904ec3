//! UI module - widgets shared by the page views

pub mod components;
