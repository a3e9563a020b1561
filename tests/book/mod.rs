mod booking_test;
mod browse_test;
mod create_test;
mod history_test;
