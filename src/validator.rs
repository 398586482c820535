//! Syntax checks for user supplied domains and ports.
//!
//! Both checks are pure and never fail: malformed input is simply `false`.

use once_cell::sync::Lazy;

const MIN_PORT: f64 = 0.0;
const MAX_PORT: f64 = 65536.0;

/// Returns true if `domain` looks like a dotted domain name.
///
/// The leading label is 1 to 63 characters of `[A-Za-z0-9-]` and must not
/// start or end with a hyphen. It is followed by one or more `.` segments
/// made of at least two ASCII letters. Segments after the leading one are
/// not checked for hyphens or length, so `sub.example.com` is accepted while
/// `www.my-site.com` and `a.b2.com` are not.
///
/// ```
/// assert!(hostsmith::validate_domain("example.com"));
/// assert!(!hostsmith::validate_domain("-bad.com"));
/// assert!(!hostsmith::validate_domain("localhost"));
/// ```
pub fn validate_domain(domain: &str) -> bool {
    // same language as ^(?!-)[A-Za-z0-9-]{1,63}(?<!-)(\.[A-Za-z]{2,})+$
    static RE: Lazy<regex::Regex> = Lazy::new(|| {
        regex::Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z]{2,})+$")
            .unwrap()
    });

    RE.is_match(domain)
}

/// Returns true if `port` lies strictly between 0 and 65536.
///
/// Fractional values inside the range are accepted, NaN never is.
///
/// Any type with a lossless conversion into `f64` is taken as is. `i64`,
/// `u64` and `usize` have none, cast them first.
///
/// ```
/// assert!(hostsmith::validate_port(8080));
/// assert!(!hostsmith::validate_port(0));
/// assert!(!hostsmith::validate_port(f64::NAN));
/// assert!(!hostsmith::validate_port(70000u64 as f64));
/// ```
#[inline]
pub fn validate_port<N>(port: N) -> bool
where
    N: Into<f64>,
{
    let port = port.into();
    port > MIN_PORT && port < MAX_PORT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_domain() {
        for (domain, ok) in [
            ("example.com", true),
            ("sub.example.com", true),
            ("EXAMPLE.COM", true),
            ("a.io", true),
            ("x1-y2.org", true),
            ("123.com", true),
            ("foo.bar.baz.qux", true),
            ("-bad.com", false),
            ("bad-.com", false),
            ("-.com", false),
            ("nodotatall", false),
            ("", false),
            ("example.c", false),
            ("example.c0m", false),
            ("example.co-m", false),
            ("a..com", false),
            (".com", false),
            ("example.com.", false),
            ("www.my-site.com", false),
            ("a.b2.com", false),
            ("exa mple.com", false),
            ("exa_mple.com", false),
            ("example.com\n", false),
            ("\texample.com", false),
            ("bücher.de", false),
            ("127.0.0.1", false),
        ] {
            assert_eq!(ok, validate_domain(domain), "domain: {:?}", domain);
        }
    }

    #[test]
    fn test_validate_domain_label_length() {
        let label = "a".repeat(63);
        assert!(validate_domain(&format!("{}.com", label)));

        let label = "a".repeat(64);
        assert!(!validate_domain(&format!("{}.com", label)));

        // later segments are not length checked
        let tail = "b".repeat(200);
        assert!(validate_domain(&format!("a.{}", tail)));
    }

    #[test]
    fn test_validate_domain_adversarial() {
        for input in [
            "-".repeat(100_000),
            ".".repeat(100_000),
            "-.".repeat(50_000),
            format!("{}!", "a.".repeat(50_000)),
            format!("a{}", ".ab".repeat(50_000)) + "-",
        ] {
            assert!(!validate_domain(&input));
        }

        assert!(validate_domain(&format!("a{}", ".ab".repeat(50_000))));
    }

    #[test]
    fn test_validate_port() {
        assert!(!validate_port(0));
        assert!(validate_port(1));
        assert!(validate_port(80u16));
        assert!(validate_port(65535u16));
        assert!(validate_port(65535));
        assert!(!validate_port(65536));
        assert!(!validate_port(-1));
        assert!(!validate_port(u32::MAX));
        assert!(!validate_port(70000u64 as f64));
        assert!(validate_port(443usize as f64));
        assert!(!validate_port(i64::MIN as f64));
        assert!(validate_port(80.5));
        assert!(validate_port(0.5f32));
        assert!(!validate_port(-0.0));
        assert!(validate_port(65535.5));
        assert!(!validate_port(f64::NAN));
        assert!(!validate_port(f64::INFINITY));
        assert!(!validate_port(f64::NEG_INFINITY));
    }

    #[test]
    fn test_idempotent() {
        for domain in ["example.com", "-bad.com", ""] {
            assert_eq!(validate_domain(domain), validate_domain(domain));
        }
        for port in [0.0, 1.0, 65536.0, f64::NAN] {
            assert_eq!(validate_port(port), validate_port(port));
        }
    }
}
