use crc32fast::Hasher;

const SEED_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h',
    'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Derive a stable id seed from a form key using CRC32
pub fn get_form_seed(form_key: &str) -> String {
    let mut buff = String::from(form_key);
    if !form_key.starts_with("form://") {
        buff = format!("form://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for block instances
///
/// Ids look like `<seed>-<n>`. Two editing sessions on the same form should
/// use [`IdGenerator::random`] so their ids never collide.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(form_key: &str) -> Self {
        Self {
            seed: get_form_seed(form_key),
            count: 0,
        }
    }

    /// Generator with a random seed
    pub fn random() -> Self {
        Self::from_seed(nanoid::nanoid!(8, &SEED_ALPHABET))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Generate ids until one is not taken
    pub fn next_unused(&mut self, is_taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id();
            if !is_taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}
