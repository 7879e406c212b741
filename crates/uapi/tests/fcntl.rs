use uapi::errno::EINVAL;
use uapi::fcntl::{OpenFlags, SEEK_CUR, SEEK_END, SEEK_SET, SeekWhence};

#[test]
fn test_access_mode_bits() {
    assert!(OpenFlags::O_RDONLY.readable());
    assert!(!OpenFlags::O_RDONLY.writable());

    assert!(!OpenFlags::O_WRONLY.readable());
    assert!(OpenFlags::O_WRONLY.writable());

    assert!(OpenFlags::O_RDWR.readable());
    assert!(OpenFlags::O_RDWR.writable());
}

#[test]
fn test_accmode_three_is_neither() {
    let flags = OpenFlags::O_ACCMODE;
    assert!(!flags.readable());
    assert!(!flags.writable());
}

#[test]
fn test_extra_flags_do_not_change_access_mode() {
    let flags = OpenFlags::O_WRONLY | OpenFlags::O_NONBLOCK | OpenFlags::O_CLOEXEC;
    assert_eq!(flags.access_mode(), 1);
    assert!(flags.writable());
    assert!(!flags.readable());
}

#[test]
fn test_seek_whence_from_raw() {
    assert_eq!(SeekWhence::try_from(SEEK_SET), Ok(SeekWhence::Set));
    assert_eq!(SeekWhence::try_from(SEEK_CUR), Ok(SeekWhence::Cur));
    assert_eq!(SeekWhence::try_from(SEEK_END), Ok(SeekWhence::End));
}

#[test]
fn test_seek_whence_unknown_is_einval() {
    for raw in [-1, 3, 4, 42] {
        assert_eq!(SeekWhence::try_from(raw), Err(EINVAL));
    }
}

#[test]
fn test_seek_whence_into_raw() {
    assert_eq!(i32::from(SeekWhence::Set), 0);
    assert_eq!(i32::from(SeekWhence::Cur), 1);
    assert_eq!(i32::from(SeekWhence::End), 2);
}
