use crate::server::{
    data::member::MemberRepository,
    error::AppError,
    model::member::{CreateMemberParam, MemberStatus},
};
use chrono::NaiveDate;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod find_active_expiring_on;
mod find_latest_by_email;
mod mark_expired;
mod update_expiry;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
