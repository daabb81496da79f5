use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use qrstash::{
    EccLevel, Error, FileSystem, FolderStatus, NoopOpener, OsFileSystem, OutputLocation,
    QrEncoder, QrStash, RenderOptions, next_available_path, resolve_output_folder,
};

fn scannable() -> RenderOptions {
    RenderOptions {
        ecc_level: EccLevel::L,
        module_size: 6,
        border: 4,
        fill_color: [0, 0, 0],
        back_color: [255, 255, 255],
    }
}

fn stash_in(location: OutputLocation, base_name: &str) -> QrStash {
    QrStash::new(
        location,
        base_name,
        "png",
        QrEncoder::new(scannable()),
        OsFileSystem,
        Box::new(NoopOpener),
    )
}

fn decode(path: &Path) -> String {
    let gray = image::open(path).expect("open saved image").to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(gray);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    let (_meta, content) = grids[0].decode().expect("decode QR grid");
    content
}

#[test]
fn saved_file_matches_reported_path_and_content() {
    let home = tempfile::tempdir().expect("tempdir");
    let downloads = home.path().join("Downloads");
    let stash = stash_in(OutputLocation::new(&downloads, "QRCode_Images"), "qrcode_");

    let saved = stash.save("hello world").expect("save");

    let expected = downloads.join("QRCode_Images").join("qrcode_1.png");
    assert_eq!(saved.path, expected);
    assert_eq!(saved.folder_status, FolderStatus::Created);
    assert_eq!(fs::metadata(&expected).expect("file exists").len() as usize, saved.bytes);
    assert_eq!(decode(&saved.path), "hello world");
}

#[test]
fn repeated_saves_count_up_without_gaps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stash = stash_in(OutputLocation::fixed(dir.path()), "qrcode_");

    for n in 1..=5 {
        let saved = stash.save(&format!("payload {n}")).expect("save");
        assert_eq!(saved.path, dir.path().join(format!("qrcode_{n}.png")));
    }
    assert_eq!(stash.next_path(), dir.path().join("qrcode_6.png"));
}

#[test]
fn allocation_continues_after_existing_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("output1.png"), b"old").expect("seed");
    fs::write(dir.path().join("output2.png"), b"old").expect("seed");

    let next = next_available_path(&|p: &Path| p.exists(), dir.path(), "output", "png");
    assert_eq!(next, dir.path().join("output3.png"));

    let stash = stash_in(OutputLocation::fixed(dir.path()), "output");
    let saved = stash.save("third").expect("save");
    assert_eq!(saved.path, dir.path().join("output3.png"));
    assert_eq!(fs::read(dir.path().join("output1.png")).expect("read"), b"old");
}

#[test]
fn folder_resolution_is_idempotent_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");

    let first = resolve_output_folder(&OsFileSystem, dir.path(), "QRCode_Images").expect("first");
    let second = resolve_output_folder(&OsFileSystem, dir.path(), "QRCode_Images").expect("second");

    assert_eq!(first.status, FolderStatus::Created);
    assert_eq!(second.status, FolderStatus::Existing);
    assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
}

/// Refuses directory creation and records any write attempt
#[derive(Default)]
struct LockedDownloads {
    writes: RefCell<Vec<PathBuf>>,
}

impl FileSystem for LockedDownloads {
    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn is_dir(&self, _path: &Path) -> bool {
        false
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn write(&self, path: &Path, _bytes: &[u8]) -> io::Result<()> {
        self.writes.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

#[test]
fn permission_denied_is_reported_and_nothing_written() {
    let fs = LockedDownloads::default();
    let stash = QrStash::new(
        OutputLocation::new("/home/locked/Downloads", "QRCode_Images"),
        "qrcode_",
        "png",
        QrEncoder::default(),
        &fs,
        Box::new(NoopOpener),
    );

    let err = stash.save("some text").expect_err("save must fail");
    match err {
        Error::PermissionDenied { path } => {
            assert_eq!(path, PathBuf::from("/home/locked/Downloads/QRCode_Images"))
        }
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
    assert!(fs.writes.borrow().is_empty());
}

#[cfg(unix)]
#[test]
fn read_only_parent_yields_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).expect("create locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).expect("chmod");

    let result = resolve_output_folder(&OsFileSystem, &locked, "QRCode_Images");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");

    match result {
        Err(Error::PermissionDenied { path }) => assert_eq!(path, locked.join("QRCode_Images")),
        // privileged users bypass directory permissions
        Ok(resolved) => assert!(resolved.path.is_dir()),
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn oversized_border_fails_save_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stash = QrStash::new(
        OutputLocation::fixed(dir.path().join("codes")),
        "qrcode_",
        "png",
        QrEncoder::new(RenderOptions {
            border: 3_000_000_000,
            ..scannable()
        }),
        OsFileSystem,
        Box::new(NoopOpener),
    );

    assert!(matches!(stash.save("a"), Err(Error::Image(_))));
    let written = fs::read_dir(dir.path().join("codes"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(written, 0);
}
