// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object handles for arena-based scene storage.
//!
//! Keys are created by `slotmap::SlotMap` and remain valid even after other
//! objects are removed (generational indices). A key whose object has been
//! deleted never resolves again, even if its slot is reused.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to an object stored in a [`Scene`](crate::Scene).
    pub struct ObjectKey;
}
