use std::sync::Arc;

use block_dev::RamDisk;
use index_fs::{Error, IndexFileSystem, NAME_MAX_LEN};

fn new_fs() -> Arc<IndexFileSystem> {
    IndexFileSystem::format(Arc::new(RamDisk::new(512)))
}

#[test]
fn create_open_remove() {
    let fs = new_fs();
    assert!(fs.list().is_empty());

    fs.create("a", 0).unwrap();
    fs.create("b", 1000).unwrap();
    assert_eq!(fs.create("a", 10), Err(Error::AlreadyExists));
    assert_eq!(fs.list(), ["a", "b"]);

    let b = fs.open("b").unwrap();
    assert_eq!(b.length(), 1000);
    let mut buf = [0xff; 1000];
    assert_eq!(b.read_at(&mut buf, 0), 1000);
    assert!(buf.iter().all(|&byte| byte == 0));

    fs.remove("a").unwrap();
    assert_eq!(fs.remove("a"), Err(Error::NotFound));
    assert!(matches!(fs.open("a"), Err(Error::NotFound)));
    assert_eq!(fs.list(), ["b"]);
}

#[test]
fn names_are_checked() {
    let fs = new_fs();
    assert_eq!(fs.create("", 0), Err(Error::InvalidName));
    assert_eq!(fs.create("dir/file", 0), Err(Error::InvalidName));
    assert_eq!(
        fs.create(&"n".repeat(NAME_MAX_LEN + 1), 0),
        Err(Error::InvalidName)
    );
    fs.create(&"n".repeat(NAME_MAX_LEN), 0).unwrap();
    assert!(matches!(fs.open(""), Err(Error::NotFound)));
}

#[test]
fn directory_grows_past_its_initial_slots() {
    let fs = new_fs();
    let names: Vec<String> = (0..40).map(|i| format!("file{i}")).collect();
    for name in &names {
        fs.create(name, 0).unwrap();
    }
    assert_eq!(fs.list(), names);

    // 删除后空槽位会被复用，名字顺序随之改变
    fs.remove("file3").unwrap();
    fs.create("late", 0).unwrap();
    let listed = fs.list();
    assert_eq!(listed[3], "late");
    assert_eq!(listed.len(), 40);
}

#[test]
fn removed_names_free_their_sectors() {
    let fs = new_fs();
    let free = fs.free_sectors();
    fs.create("tmp", 5000).unwrap();
    assert!(fs.free_sectors() < free);
    fs.remove("tmp").unwrap();
    assert_eq!(fs.free_sectors(), free);
}
