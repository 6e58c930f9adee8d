use std::sync::Arc;
use std::thread;

use block_dev::RamDisk;
use index_fs::{BlockDevice, IndexFileSystem, Inode, MAX_FILE_SIZE, SECTOR_SIZE};
use rand::Rng;

fn new_fs(sectors: u32) -> Arc<IndexFileSystem> {
    IndexFileSystem::format(Arc::new(RamDisk::new(sectors)))
}

fn new_file(fs: &Arc<IndexFileSystem>, name: &str) -> Inode {
    fs.create(name, 0).unwrap();
    fs.open(name).unwrap()
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0; len];
    rand::thread_rng().fill(&mut data[..]);
    data
}

#[test]
fn round_trip_across_bands() {
    let fs = new_fs(4096);

    for (name, sectors) in [("direct", 3), ("indirect", 10), ("doubly", 2000)] {
        let file = new_file(&fs, name);
        let data = random_bytes(sectors * SECTOR_SIZE);
        assert_eq!(file.write_at(&data, 0), data.len());
        assert_eq!(file.length() as usize, data.len());

        let mut buf = vec![0; data.len()];
        assert_eq!(file.read_at(&mut buf, 0), data.len());
        assert!(buf == data, "{name} read back differently");
    }
}

#[test]
fn unaligned_round_trip() {
    let fs = new_fs(1024);
    let file = new_file(&fs, "unaligned");

    let data = random_bytes(3000);
    assert_eq!(file.write_at(&data, 700), 3000);
    assert_eq!(file.length(), 3700);

    let mut buf = vec![0xff; 3700];
    assert_eq!(file.read_at(&mut buf, 0), 3700);
    assert!(buf[..700].iter().all(|&b| b == 0));
    assert_eq!(&buf[700..], &data[..]);

    // 跨扇区覆盖中间一段，两侧保持不变
    assert_eq!(file.write_at(&[7; 600], 1000), 600);
    let mut buf = vec![0; 3000];
    file.read_at(&mut buf, 700);
    assert_eq!(&buf[..300], &data[..300]);
    assert!(buf[300..900].iter().all(|&b| b == 7));
    assert_eq!(&buf[900..], &data[900..]);
}

#[test]
fn never_written_bytes_read_as_zero() {
    let fs = new_fs(1024);
    let file = new_file(&fs, "sparse");

    let offset = 70_000;
    assert_eq!(file.write_at(b"x", offset), 1);
    assert_eq!(file.length(), offset + 1);

    let mut buf = vec![0xff; offset as usize];
    assert_eq!(file.read_at(&mut buf, 0), offset as usize);
    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn length_only_grows() {
    let fs = new_fs(256);
    let file = new_file(&fs, "grow");

    file.write_at(&[1; 100], 0);
    assert_eq!(file.length(), 100);
    file.write_at(&[2; 10], 20);
    assert_eq!(file.length(), 100);
    file.write_at(&[3; 10], 200);
    assert_eq!(file.length(), 210);
}

#[test]
fn reads_stop_at_end_of_file() {
    let fs = new_fs(256);
    let file = new_file(&fs, "eof");
    file.write_at(&[9; 1000], 0);

    let mut buf = [0; 100];
    assert_eq!(file.read_at(&mut buf, 950), 50);
    assert!(buf[..50].iter().all(|&b| b == 9));
    assert_eq!(file.read_at(&mut buf, 1000), 0);
    assert_eq!(file.read_at(&mut buf, 5000), 0);
}

#[test]
fn openers_share_one_inode() {
    let fs = new_fs(256);
    let first = new_file(&fs, "shared");
    let second = fs.open("shared").unwrap();
    let third = second.reopen();

    assert_eq!(first.inumber(), second.inumber());
    assert_eq!(first.open_count(), 3);
    assert_eq!(fs.open_inode_count(), 1);

    first.write_at(b"hello", 0);
    let mut buf = [0; 5];
    assert_eq!(third.read_at(&mut buf, 0), 5);
    assert_eq!(&buf, b"hello");
    assert_eq!(second.length(), 5);

    drop(first);
    third.close();
    assert_eq!(second.open_count(), 1);
    drop(second);
    assert_eq!(fs.open_inode_count(), 0);
}

#[test]
fn last_close_of_removed_file_frees_every_sector() {
    let fs = new_fs(4096);
    let before = fs.free_sectors();

    let first = new_file(&fs, "doomed");
    let second = fs.open("doomed").unwrap();
    let data = random_bytes(2000 * SECTOR_SIZE);
    assert_eq!(second.write_at(&data, 0), data.len());

    fs.remove("doomed").unwrap();
    assert!(first.is_removed());
    assert!(fs.open("doomed").is_err());
    assert!(!fs.list().contains(&"doomed".to_string()));

    // 仍被打开时数据依旧可读写
    drop(first);
    let mut buf = vec![0; SECTOR_SIZE];
    assert_eq!(second.read_at(&mut buf, 1500 * SECTOR_SIZE as u32), SECTOR_SIZE);
    assert_eq!(&buf[..], &data[1500 * SECTOR_SIZE..1501 * SECTOR_SIZE]);
    assert!(fs.free_sectors() < before);

    drop(second);
    assert_eq!(fs.free_sectors(), before);
}

#[test]
fn closing_without_remove_keeps_sectors() {
    let fs = new_fs(256);
    let file = new_file(&fs, "kept");
    file.write_at(&[5; 2048], 0);
    let free = fs.free_sectors();
    drop(file);

    assert_eq!(fs.free_sectors(), free);
    let file = fs.open("kept").unwrap();
    assert_eq!(file.length(), 2048);
}

#[test]
fn denied_writes_are_ignored() {
    let fs = new_fs(256);
    let file = new_file(&fs, "exe");
    file.write_at(b"image", 0);

    let runner = file.reopen();
    runner.deny_write();
    assert_eq!(file.write_at(b"patch", 0), 0);
    assert_eq!(file.write_at(b"more", 5), 0);
    assert_eq!(file.length(), 5);

    runner.allow_write();
    assert_eq!(file.write_at(b"patch", 0), 5);
}

#[test]
#[should_panic]
fn deny_count_cannot_exceed_openers() {
    let fs = new_fs(256);
    let file = new_file(&fs, "exe");
    file.deny_write();
    file.deny_write();
}

#[test]
fn exhaustion_grows_partially() {
    let fs = new_fs(64);
    let free = fs.free_sectors();
    let file = new_file(&fs, "big");

    let data = random_bytes(100 * SECTOR_SIZE);
    let written = file.write_at(&data, 0);
    let length = file.length() as usize;
    assert_eq!(written, length);
    assert!(length > 0 && length < data.len());
    assert_eq!(length % SECTOR_SIZE, 0);
    assert_eq!(fs.free_sectors(), 0);

    let mut buf = vec![0; length];
    assert_eq!(file.read_at(&mut buf, 0), length);
    assert_eq!(&buf[..], &data[..length]);

    fs.remove("big").unwrap();
    drop(file);
    assert_eq!(fs.free_sectors(), free);
}

#[test]
fn failed_create_leaves_no_trace() {
    let fs = new_fs(64);
    let free = fs.free_sectors();

    assert_eq!(fs.create("huge", 1 << 20), Err(index_fs::Error::NoSpace));
    assert_eq!(fs.free_sectors(), free);
    assert!(fs.list().is_empty());
}

#[test]
fn writes_beyond_max_size_are_dropped() {
    let fs = new_fs(64);
    let file = new_file(&fs, "far");
    assert_eq!(file.write_at(b"x", MAX_FILE_SIZE), 0);
    assert_eq!(file.length(), 0);
}

#[test]
fn contents_survive_remount() {
    let device: Arc<dyn BlockDevice> = Arc::new(RamDisk::new(2048));
    let data = random_bytes(1200 * SECTOR_SIZE + 17);
    {
        let fs = IndexFileSystem::format(device.clone());
        let file = new_file(&fs, "persist");
        file.write_at(&data, 0);
    }

    let fs = IndexFileSystem::mount(device);
    let file = fs.open("persist").unwrap();
    assert_eq!(file.length() as usize, data.len());
    let mut buf = vec![0; data.len()];
    file.read_at(&mut buf, 0);
    assert!(buf == data);
}

#[test]
#[should_panic(expected = "does not hold an inode")]
fn opening_a_non_inode_sector_is_fatal() {
    let fs = new_fs(64);
    fs.open_inode(63);
}

#[test]
fn concurrent_growers_do_not_collide() {
    let fs = new_fs(2048);
    let file = new_file(&fs, "busy");

    thread::scope(|scope| {
        for id in 0..4u8 {
            let handle = file.reopen();
            scope.spawn(move || {
                for round in 0..50u32 {
                    let offset = (round * 4 + id as u32) * 300;
                    assert_eq!(handle.write_at(&[id + 1; 300], offset), 300);
                }
            });
        }
    });

    assert_eq!(file.length(), 200 * 300);
    let mut buf = vec![0; 200 * 300];
    file.read_at(&mut buf, 0);
    for (index, chunk) in buf.chunks(300).enumerate() {
        let id = (index % 4) as u8;
        assert!(chunk.iter().all(|&b| b == id + 1), "chunk {index} was clobbered");
    }
}
