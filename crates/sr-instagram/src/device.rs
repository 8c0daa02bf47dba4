//! Deterministic Android device identity
//!
//! Instagram ties sessions to a device. Deriving every identifier from the
//! login name makes repeated logins look like the same phone.

use sha2::{Digest, Sha256};

/// Android builds to pick from, as `android_version/release; dpi; resolution; manufacturer; model; device; cpu`
const DEVICES: &[&str] = &[
    "29/10; 420dpi; 1080x2129; samsung; SM-G975F; beyond2; exynos9820",
    "28/9; 480dpi; 1080x2220; samsung; SM-G960F; starlte; samsungexynos9810",
    "30/11; 440dpi; 1080x2340; Xiaomi; M2007J20CG; surya; qcom",
    "29/10; 560dpi; 1440x2792; Google/google; Pixel 4 XL; coral; coral",
    "28/9; 420dpi; 1080x2280; OnePlus; ONEPLUS A6003; OnePlus6; qcom",
];

/// Instagram Android app version sent in the user agent
pub const APP_VERSION: &str = "222.0.0.13.114";

/// Version code paired with [`APP_VERSION`]
pub const APP_VERSION_CODE: &str = "350696709";

/// Device identifiers presented on every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// `android-` followed by 16 hex characters
    pub device_id: String,
    pub uuid: String,
    pub phone_id: String,
    pub adid: String,
    pub build: String,
}

impl Device {
    /// Derive the identity for `seed`, normally the login username
    pub fn from_seed(seed: &str) -> Self {
        let digest = hash(seed, "device");
        let build_index = usize::from(digest[0]) % DEVICES.len();

        Self {
            device_id: format!("android-{}", &hex::encode(digest)[..16]),
            uuid: uuid_from(seed, "uuid"),
            phone_id: uuid_from(seed, "phone"),
            adid: uuid_from(seed, "adid"),
            build: DEVICES[build_index].to_string(),
        }
    }

    /// User agent the Android app would send from this device
    pub fn user_agent(&self, locale: &str) -> String {
        format!(
            "Instagram {} Android ({}; {}; {})",
            APP_VERSION, self.build, locale, APP_VERSION_CODE
        )
    }
}

fn hash(seed: &str, salt: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(b":");
    hasher.update(salt.as_bytes());

    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

fn uuid_from(seed: &str, salt: &str) -> String {
    let digest = hash(seed, salt);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}
