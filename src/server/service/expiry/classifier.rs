//! Splits candidate members into warning and expiry groups.

use std::collections::HashSet;

use super::calendar::ExpiryCalendar;
use crate::server::model::member::{Member, MemberStatus};

/// Members due for each kind of notification on one run.
#[derive(Debug, Default)]
pub struct Classified {
    pub warning: Vec<Member>,
    pub expiring: Vec<Member>,
}

/// Classifies active members by expiry date.
///
/// A member expiring today lands in `expiring`, one expiring on the warning date in
/// `warning`. Inactive members, other dates and repeated ids are dropped, so the two
/// lists never share a member. When the warning date equals today the member is only
/// treated as expiring.
pub fn classify(members: Vec<Member>, calendar: ExpiryCalendar) -> Classified {
    let mut seen = HashSet::new();
    let mut classified = Classified::default();

    for member in members {
        if member.status != MemberStatus::Active || !seen.insert(member.id) {
            continue;
        }

        if member.expiry_date == calendar.today {
            classified.expiring.push(member);
        } else if member.expiry_date == calendar.warning_date {
            classified.warning.push(member);
        }
    }

    classified
}
