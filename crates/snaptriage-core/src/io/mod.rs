pub mod image_io;

pub use image_io::{
    image_dimensions, load_payload, load_payloads, reduced_output_path, save_payload,
};
