mod handler;
mod model;

pub use handler::{get_hash, get_list, get_string, set_hash, set_list, set_string};
