use chrdev::{
    AccessMode, DevError, DeviceDescriptor, DevicePolicy, DeviceSpec, OpenFlags, makedev,
};

const POLICIES: [DevicePolicy; 3] = [
    DevicePolicy::ReadOnly,
    DevicePolicy::WriteOnly,
    DevicePolicy::ReadWrite,
];

fn device(policy: DevicePolicy) -> DeviceDescriptor {
    let spec = DeviceSpec::new("PERM", 16, policy);
    DeviceDescriptor::new(makedev(240, 0), "perm-0", &spec).unwrap()
}

fn allowed(policy: DevicePolicy, mode: AccessMode) -> bool {
    match policy {
        DevicePolicy::ReadWrite => true,
        DevicePolicy::ReadOnly => mode == AccessMode::READ,
        DevicePolicy::WriteOnly => mode == AccessMode::WRITE,
    }
}

#[test]
fn test_open_grid() {
    let modes = [AccessMode::READ, AccessMode::WRITE, AccessMode::READ | AccessMode::WRITE];

    for policy in POLICIES {
        let dev = device(policy);
        for mode in modes {
            let result = dev.open(mode);
            if allowed(policy, mode) {
                let session = result.unwrap();
                assert_eq!(session.mode(), mode);
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    DevError::PermissionDenied,
                    "{:?} opened as {:?}",
                    policy,
                    mode
                );
            }
        }
    }
}

#[test]
fn test_open_with_flags_grid() {
    let cases = [
        (OpenFlags::O_RDONLY, AccessMode::READ),
        (OpenFlags::O_WRONLY, AccessMode::WRITE),
        (OpenFlags::O_RDWR, AccessMode::READ | AccessMode::WRITE),
    ];

    for policy in POLICIES {
        let dev = device(policy);
        for (flags, mode) in cases {
            // Non access-mode bits must not change the outcome.
            for extra in [OpenFlags::empty(), OpenFlags::O_NONBLOCK | OpenFlags::O_CLOEXEC] {
                let result = dev.open_with_flags(flags | extra);
                assert_eq!(result.is_ok(), allowed(policy, mode), "{:?} {:?}", policy, flags);
            }
        }
    }
}

#[test]
fn test_denied_open_leaves_device_untouched() {
    let dev = device(DevicePolicy::ReadOnly);
    assert!(dev.open(AccessMode::WRITE).is_err());

    let mut session = dev.open(AccessMode::READ).unwrap();
    let mut buf = [0xffu8; 16];
    assert_eq!(session.read(&mut buf).unwrap(), 16);
    assert_eq!(buf, [0u8; 16]);
}

#[test]
fn test_session_mode_gates_io() {
    let dev = device(DevicePolicy::ReadWrite);

    let mut reader = dev.open(AccessMode::READ).unwrap();
    assert!(reader.readable());
    assert!(!reader.writable());
    assert_eq!(reader.write(b"abc").unwrap_err(), DevError::PermissionDenied);

    let mut writer = dev.open(AccessMode::WRITE).unwrap();
    let mut buf = [0u8; 3];
    assert_eq!(writer.read(&mut buf).unwrap_err(), DevError::PermissionDenied);
    assert_eq!(writer.offset(), 0);
}

#[test]
fn test_empty_mode_on_read_write_device() {
    let dev = device(DevicePolicy::ReadWrite);
    let mut session = dev.open_with_flags(OpenFlags::O_ACCMODE).unwrap();
    assert_eq!(session.mode(), AccessMode::empty());
    // Seeking needs no access mode.
    assert_eq!(session.seek(4, chrdev::SeekWhence::Set).unwrap(), 4);

    for policy in [DevicePolicy::ReadOnly, DevicePolicy::WriteOnly] {
        assert_eq!(
            device(policy).open(AccessMode::empty()).unwrap_err(),
            DevError::PermissionDenied
        );
    }
}

#[test]
fn test_errno_mapping() {
    assert_eq!(DevError::PermissionDenied.to_errno(), -1);
    assert_eq!(DevError::InvalidOffset.to_errno(), -22);
    assert_eq!(DevError::IoError.to_errno(), -14);
    assert_eq!(DevError::NoSpace.to_errno(), -12);
    assert_eq!(isize::from(DevError::NoDevice), -6);
}

#[test]
fn test_device_from_raw_policy_bits() {
    let cases = [
        (DevicePolicy::RDONLY, DevicePolicy::ReadOnly),
        (DevicePolicy::WRONLY, DevicePolicy::WriteOnly),
        (DevicePolicy::RDWR, DevicePolicy::ReadWrite),
    ];
    for (bits, policy) in cases {
        let spec = DeviceSpec::with_policy_bits("RAW", 8, bits).unwrap();
        assert_eq!(spec.policy, policy);
        assert_eq!(spec.policy.bits(), bits);
    }

    for bits in [0, 0x02, 0x12, 0xff] {
        assert_eq!(
            DeviceSpec::with_policy_bits("RAW", 8, bits).unwrap_err(),
            DevError::InvalidArgument
        );
    }
}
