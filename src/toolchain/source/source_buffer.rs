use mmap_rs;
use std::fs::File;

enum SourceBufferKind<'a> {
    File { buffer: mmap_rs::Mmap },
    Memory { bytes: &'a [u8] },
}

// Keeps source and a file name in the same object, so they provide the same lifetimes.
pub struct SourceBuffer<'a> {
    kind: SourceBufferKind<'a>,
    file_name: String,
}

impl<'a> SourceBuffer<'a> {
    // Maps the file read-only. Does nothing to check that the contents are valid utf-8;
    // the lexer cursor treats the input as raw bytes.
    pub fn new_from_file(file_path: &std::path::Path) -> Result<SourceBuffer<'_>, mmap_rs::Error> {
        let file = File::open(file_path)?;
        let len = File::metadata(&file)?.len();
        let buffer = unsafe {
            mmap_rs::MmapOptions::new(len.try_into().unwrap())?.with_file(&file, 0).map()?
        };
        let file_name = file_path.to_string_lossy().into_owned();
        Ok(SourceBuffer { kind: SourceBufferKind::File { buffer }, file_name })
    }

    pub fn new_from_string(string: &'a str, name: &str) -> Result<SourceBuffer<'a>, mmap_rs::Error> {
        Self::new_from_bytes(string.as_bytes(), name)
    }

    pub fn new_from_bytes(bytes: &'a [u8], name: &str) -> Result<SourceBuffer<'a>, mmap_rs::Error> {
        let file_name = String::from(name);
        Ok(SourceBuffer { kind: SourceBufferKind::Memory { bytes }, file_name })
    }

    pub fn bytes(&self) -> &'_ [u8] {
        match &self.kind {
            SourceBufferKind::File { buffer } => buffer.as_slice(),
            SourceBufferKind::Memory { bytes } => bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }
}
