//! # Merge List Persistence

mod merges_io;

pub use merges_io::{
    MERGE_FILE_MAGIC, MERGE_FILE_VERSION, load_merge_list_from_path, read_merge_list,
    save_merge_list_to_path, write_merge_list,
};
