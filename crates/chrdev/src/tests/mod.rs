// Unit tests for chrdev.
//
// NOTE: Registry tests need the mock collaborator from `test-support`. The mock cannot depend on
// this crate, so `DevRegistryOps` is implemented for it here and the tests live under `src/`.

extern crate std;

use alloc::sync::Arc;
use test_support::mock::registry::MockDevRegistry;

use crate::{DevError, DevRange, DevRegistryOps, DriverRegistry, PublishHandle, makedev, minor};

impl DevRegistryOps for MockDevRegistry {
    fn allocate_range(&self, count: u32, name: &str) -> Result<DevRange, DevError> {
        let (major, first_minor) = self
            .allocate(count, name)
            .ok_or(DevError::AllocationFailed)?;
        Ok(DevRange::new(makedev(major, first_minor), count))
    }

    fn release_range(&self, range: DevRange) {
        self.release(range.major(), minor(range.base()), range.count());
    }

    fn publish(&self, devno: u64, name: &str) -> Result<PublishHandle, DevError> {
        let token = MockDevRegistry::publish(self, devno, name).ok_or(DevError::PublishFailed)?;
        Ok(PublishHandle::new(devno, token))
    }

    fn revoke(&self, handle: PublishHandle) -> Result<(), DevError> {
        if MockDevRegistry::revoke(self, handle.devno()) {
            Ok(())
        } else {
            Err(DevError::NoDevice)
        }
    }
}

/// Fresh mock plus an empty registry wired to it.
fn mock_registry() -> (Arc<MockDevRegistry>, DriverRegistry) {
    let mock = Arc::new(MockDevRegistry::new());
    let registry = DriverRegistry::new(mock.clone());
    (mock, registry)
}

mod scenario;
