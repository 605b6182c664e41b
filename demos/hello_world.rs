use std::io::{Read, Write};

use filestore::filter::with_ext;
use filestore::path::change_extension;
use filestore::{DiskFS, FileFilter, FileInfo, FsBackend, ReadableFile, WritableFile};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // RUST_LOG=filestore=debug shows every directory created, file written and entry moved.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tmp = std::env::temp_dir();
    println!("Temp dir: {}", tmp.display());

    // nothing is created on disk yet
    let fs = DiskFS::new(tmp.join("my_store"));

    // creates `my_store/docs` on demand, then the file itself
    let mut first = fs.write("docs/first.txt")?;
    first.write_all(b"Hello")?;
    WritableFile::close(&mut first)?;

    // a scoped store sees `docs` as its root
    let docs = fs.cd("docs");
    docs.write_all("second.txt", b"World")?;
    docs.write_all("notes.md", b"# not listed")?;

    // both filters must accept an entry
    let not_empty: FileFilter = Box::new(|info: &FileInfo| !info.is_empty());
    let mut greeting = Vec::new();
    for info in docs.ls(".", &[with_ext("txt"), not_empty])? {
        let mut file = docs.read(info.name())?;
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        ReadableFile::close(&mut file)?;
        greeting.push(text);
    }
    println!("{}, {}!", greeting[0], greeting[1]);

    // rename, then clean everything up
    let renamed = change_extension("docs/second.txt", "bak");
    fs.mv("docs/second.txt", &renamed)?;
    assert!(fs.exists(&renamed));

    fs.rm(".")?;
    assert!(!fs.exists("."));
    Ok(())
}
