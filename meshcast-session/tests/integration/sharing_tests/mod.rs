mod test_failed_call_is_retried;
mod test_membership_after_share;
mod test_user_connected_twice;
