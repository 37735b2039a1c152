use std::io::{Read, Write};

use rand::Rng;
use rbs_io::endpoint::{input_len, open_input, open_output};

fn scratch_path(tag: &str) -> std::path::PathBuf {
    let id: u64 = rand::thread_rng().r#gen();
    std::env::temp_dir().join(format!("rbs_io_{tag}_{id:016x}"))
}

#[test]
fn output_then_input_round_trip() {
    let path = scratch_path("roundtrip");
    {
        let mut out = open_output(&path).unwrap();
        out.write_all(b"ring buffer").unwrap();
        out.flush().unwrap();
    }

    assert_eq!(input_len(&path), Some(11));

    let mut text = String::new();
    open_input(&path).unwrap().read_to_string(&mut text).unwrap();
    assert_eq!(text, "ring buffer");

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_input_names_the_path() {
    let path = scratch_path("missing");
    let err = open_input(&path).err().unwrap();
    assert!(err.to_string().contains(&path.display().to_string()));
    assert_eq!(input_len(&path), None);
}

#[test]
fn dash_has_no_known_length() {
    assert_eq!(input_len("-"), None);
}
