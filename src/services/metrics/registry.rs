use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the marketplace
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Marketplace Metrics
    pub listings_created_total: IntCounter,
    pub bookings_total: IntCounter,
    pub booking_cancellations_total: IntCounter,
    pub sales_completed_total: IntCounter,
    pub otp_sent_total: IntCounter,
    pub otp_rejected_total: IntCounter,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("bookbay_http_requests_total", "Total HTTP requests"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "bookbay_http_request_duration_seconds",
                "HTTP request duration",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let listings_created_total = IntCounter::new(
            "bookbay_listings_created_total",
            "Book listings created",
        )?;
        registry.register(Box::new(listings_created_total.clone()))?;

        let bookings_total = IntCounter::new("bookbay_bookings_total", "Listings reserved")?;
        registry.register(Box::new(bookings_total.clone()))?;

        let booking_cancellations_total = IntCounter::new(
            "bookbay_booking_cancellations_total",
            "Reservations cancelled",
        )?;
        registry.register(Box::new(booking_cancellations_total.clone()))?;

        let sales_completed_total = IntCounter::new(
            "bookbay_sales_completed_total",
            "Sales confirmed via OTP",
        )?;
        registry.register(Box::new(sales_completed_total.clone()))?;

        let otp_sent_total = IntCounter::new("bookbay_otp_sent_total", "Sale OTPs dispatched")?;
        registry.register(Box::new(otp_sent_total.clone()))?;

        let otp_rejected_total = IntCounter::new(
            "bookbay_otp_rejected_total",
            "OTP verifications rejected",
        )?;
        registry.register(Box::new(otp_rejected_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            listings_created_total,
            bookings_total,
            booking_cancellations_total,
            sales_completed_total,
            otp_sent_total,
            otp_rejected_total,
        }))
    }

    /// Export all metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
