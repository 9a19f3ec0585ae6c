// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! TCP sequence numbers and operations on them.

use core::{fmt, ops};

/// A TCP sequence number.
///
/// Per RFC 793 (https://tools.ietf.org/html/rfc793#section-3.3):
///   It is essential to remember that the actual sequence number space is
///   finite, though very large. This space ranges from 0 to 2**32 - 1.
///   [...] all arithmetic dealing with sequence numbers must be performed
///   modulo 2**32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqNum(u32);

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(seq) = self;
        write!(f, "{}", seq)
    }
}

impl ops::Add<i32> for SeqNum {
    type Output = SeqNum;

    fn add(self, rhs: i32) -> Self::Output {
        let Self(lhs) = self;
        // Subtraction is the same as adding the two's complement.
        Self(lhs.wrapping_add(rhs as u32))
    }
}

impl ops::Sub<i32> for SeqNum {
    type Output = SeqNum;

    fn sub(self, rhs: i32) -> Self::Output {
        let Self(lhs) = self;
        Self(lhs.wrapping_sub(rhs as u32))
    }
}

impl ops::Add<u32> for SeqNum {
    type Output = SeqNum;

    fn add(self, rhs: u32) -> Self::Output {
        let Self(lhs) = self;
        Self(lhs.wrapping_add(rhs))
    }
}

impl ops::Sub for SeqNum {
    // `i32` is more intuitive than `u32`, since subtraction may yield
    // negative values.
    type Output = i32;

    fn sub(self, rhs: Self) -> Self::Output {
        let Self(lhs) = self;
        let Self(rhs) = rhs;
        lhs.wrapping_sub(rhs) as i32
    }
}

impl From<u32> for SeqNum {
    fn from(x: u32) -> Self {
        Self::new(x)
    }
}

impl From<SeqNum> for u32 {
    fn from(x: SeqNum) -> Self {
        let SeqNum(x) = x;
        x
    }
}

impl SeqNum {
    /// Creates a new sequence number.
    pub const fn new(x: u32) -> Self {
        Self(x)
    }
}

impl SeqNum {
    /// A predicate for whether a sequence number is before the other.
    ///
    /// Please refer to [`SeqNum`] for the defined order.
    pub fn before(self, other: SeqNum) -> bool {
        self - other < 0
    }

    /// A predicate for whether a sequence number is after the other.
    ///
    /// Please refer to [`SeqNum`] for the defined order.
    pub fn after(self, other: SeqNum) -> bool {
        other.before(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::{arbitrary::any, proptest, strategy::Strategy};
    use test_case::test_case;

    fn arb_seqnum() -> impl Strategy<Value = SeqNum> {
        any::<u32>().prop_map(SeqNum::new)
    }

    proptest! {
        #[test]
        fn seqnum_ord_is_antisymmetric(a in arb_seqnum(), b in arb_seqnum()) {
            if a != b {
                assert!(a.before(b) != b.before(a));
            } else {
                assert!(!a.before(b) && !b.before(a));
            }
        }

        #[test]
        fn seqnum_add_sub_roundtrip(a in arb_seqnum(), d in any::<i32>()) {
            assert_eq!(a + d - d, a);
        }
    }

    #[test_case(SeqNum::new(0), SeqNum::new(1) => true)]
    #[test_case(SeqNum::new(1), SeqNum::new(0) => false)]
    #[test_case(SeqNum::new(u32::MAX), SeqNum::new(0) => true; "wraparound")]
    #[test_case(SeqNum::new(0), SeqNum::new(u32::MAX) => false; "wraparound reversed")]
    #[test_case(SeqNum::new(1), SeqNum::new(1) => false; "equal")]
    fn seqnum_before(lhs: SeqNum, rhs: SeqNum) -> bool {
        lhs.before(rhs)
    }

    #[test]
    fn seqnum_distance() {
        assert_eq!(SeqNum::new(100) - SeqNum::new(50), 50);
        assert_eq!(SeqNum::new(50) - SeqNum::new(100), -50);
        assert_eq!(SeqNum::new(5) - SeqNum::new(u32::MAX - 4), 10);
    }
}
