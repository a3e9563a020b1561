mod login_test;
mod profile_test;
mod signup_test;
