//! # Store Module
//!
//! A named, single-value store: one current state, atomic whole-value
//! replacement, a synchronous read, derived observable selections and a
//! teardown. [`RouteState`](crate::RouteState) keeps its merged navigation
//! record in one of these.
//!
//! ```rust
//! use route_state::store::Store;
//!
//! let store = Store::new("counter", 0_u32);
//! let doubled = store.select(|n| n * 2);
//! let _sub = doubled.subscribe_next(|v| println!("doubled: {v}"));
//!
//! store.update(21).unwrap();
//! assert_eq!(*store.get_value(), 21);
//!
//! store.destroy();
//! assert!(store.update(1).is_err());
//! ```

mod core;

pub use core::Store;
