pub mod eye_helper;
