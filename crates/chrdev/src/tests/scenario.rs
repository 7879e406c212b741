use alloc::vec;

use super::*;
use crate::{OpenFlags, REFERENCE_DEVICES, SeekWhence};

#[test]
fn test_hello_world_on_read_write_device() {
    let (_mock, mut registry) = mock_registry();
    registry.initialize(&REFERENCE_DEVICES).unwrap();

    let mut session = registry.open_by_name("pcdev-2", OpenFlags::O_RDWR).unwrap();
    assert_eq!(session.write(b"HELLOWORLD").unwrap(), 10);
    assert_eq!(session.offset(), 10);

    assert_eq!(session.seek(0, SeekWhence::End).unwrap(), 1024);
    let mut buf = [0u8; 5];
    assert_eq!(session.read(&mut buf).unwrap(), 0);
    assert_eq!(session.offset(), 1024);

    assert_eq!(session.seek(0, SeekWhence::Set).unwrap(), 0);
    let mut buf = [0u8; 10];
    assert_eq!(session.read(&mut buf).unwrap(), 10);
    assert_eq!(&buf, b"HELLOWORLD");
    session.release();
}

#[test]
fn test_reference_read_only_device() {
    let (_mock, mut registry) = mock_registry();
    registry.initialize(&REFERENCE_DEVICES).unwrap();

    let mut session = registry.open_by_name("pcdev-0", OpenFlags::O_RDONLY).unwrap();
    let mut buf = vec![0xffu8; 2048];
    // Reads are clamped to capacity and the storage starts zeroed.
    assert_eq!(session.read(&mut buf).unwrap(), 1024);
    assert!(buf[..1024].iter().all(|&b| b == 0));
    assert_eq!(buf[1024], 0xff);
    assert_eq!(session.write(b"x").unwrap_err(), DevError::PermissionDenied);
}

#[test]
fn test_reference_write_only_device() {
    let (_mock, mut registry) = mock_registry();
    registry.initialize(&REFERENCE_DEVICES).unwrap();

    let mut session = registry.open_by_name("pcdev-1", OpenFlags::O_WRONLY).unwrap();
    let data = vec![0x5au8; 1500];
    assert_eq!(session.write(&data).unwrap(), 1024);
    assert_eq!(session.write(&data).unwrap_err(), DevError::NoSpace);
    let mut buf = [0u8; 4];
    assert_eq!(
        session.read(&mut buf).unwrap_err(),
        DevError::PermissionDenied
    );
}

#[test]
fn test_devices_do_not_share_storage() {
    let (_mock, mut registry) = mock_registry();
    registry.initialize(&REFERENCE_DEVICES).unwrap();

    let mut third = registry.open_by_name("pcdev-2", OpenFlags::O_RDWR).unwrap();
    third.write(b"only here").unwrap();

    let mut fourth = registry.open_by_name("pcdev-3", OpenFlags::O_RDWR).unwrap();
    let mut buf = [0xffu8; 9];
    fourth.read(&mut buf).unwrap();
    assert_eq!(buf, [0u8; 9]);
}

#[test]
fn test_storage_persists_across_sessions() {
    let (_mock, mut registry) = mock_registry();
    registry.initialize(&REFERENCE_DEVICES).unwrap();

    {
        let mut writer = registry.open_by_name("pcdev-3", OpenFlags::O_WRONLY).unwrap();
        writer.seek(100, SeekWhence::Set).unwrap();
        writer.write(b"persist").unwrap();
        writer.release();
    }

    let mut reader = registry.open_by_name("pcdev-3", OpenFlags::O_RDONLY).unwrap();
    reader.seek(100, SeekWhence::Set).unwrap();
    let mut buf = [0u8; 7];
    reader.read(&mut buf).unwrap();
    assert_eq!(&buf, b"persist");
}
