//! Generic conformance assertions for [`Interface`] implementations.
//!
//! ```rust,ignore
//! use netflood_interfaces::testing;
//!
//! let mut iface = MyInterface::new(config);
//! testing::assert_pre_start_conformance(&iface).await;
//! iface.start().await?;
//! testing::assert_stop_conformance(&mut iface).await;
//! ```

use crate::error::InterfaceError;
use crate::traits::Interface;

/// Assert that the interface has a non-empty name.
pub fn assert_has_name(iface: &impl Interface) {
    assert!(!iface.name().is_empty(), "interface name must not be empty");
}

/// Assert that the interface reports `is_connected() == false` before `start()`.
pub fn assert_not_connected_before_start(iface: &impl Interface) {
    assert!(
        !iface.is_connected(),
        "interface should not be connected before start()"
    );
}

/// Assert that transmitting before `start()` fails with `NotConnected`.
pub async fn assert_transmit_before_start_fails(iface: &impl Interface) {
    match iface.transmit(&[0x42; 20]).await {
        Err(InterfaceError::NotConnected) => {}
        Err(e) => panic!("unexpected error variant from transmit before start: {e}"),
        Ok(()) => panic!("transmit should fail before start()"),
    }
}

/// Name, connection state, and transmit behavior before `start()`.
pub async fn assert_pre_start_conformance(iface: &impl Interface) {
    assert_has_name(iface);
    assert_not_connected_before_start(iface);
    assert_transmit_before_start_fails(iface).await;
}

/// `stop()` succeeds, the interface goes offline, and a second `stop()` is
/// harmless.
pub async fn assert_stop_conformance(iface: &mut impl Interface) {
    let result = iface.stop().await;
    assert!(result.is_ok(), "stop() should succeed: {:?}", result.err());
    assert!(
        !iface.is_connected(),
        "is_connected() should be false after stop()"
    );

    let result = iface.stop().await;
    assert!(
        result.is_ok(),
        "second stop() should be idempotent: {:?}",
        result.err()
    );
}

/// An interface must be able to carry at least a link header and a few bytes.
pub fn assert_capabilities_consistent(iface: &impl Interface) {
    assert!(
        iface.mtu() > crate::framing::FRAME_HEADER_SIZE,
        "MTU must exceed the frame header"
    );
    assert!(
        iface.can_receive() || iface.can_transmit(),
        "interface must either receive or transmit"
    );
}
