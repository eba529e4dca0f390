//! Wallet generation, recovery, and encrypted key files
//!
//! A wallet is a secp256k1 signing key derived from a BIP-39 mnemonic along
//! the configured HD path, with a bech32 account address under the configured
//! prefix. Wallets persist as JSON key files holding the mnemonic sealed with
//! XSalsa20-Poly1305 under a password-derived key.
//!
//! # Example
//!
//! ```ignore
//! use cw20_kit::{NetworkConfig, Wallet};
//!
//! let config = NetworkConfig::coralnet();
//! let wallet = Wallet::load_or_create(&config.wallet.key_file, "hunter2", &config)?;
//! println!("{}", wallet.address());
//! ```

use crate::config::NetworkConfig;
use crate::error::WalletError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bip39::{Language, Mnemonic};
use cosmrs::bip32::DerivationPath;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::crypto::PublicKey;
use serde::{Deserialize, Serialize};
use std::path::Path;
use xsalsa20poly1305::aead::{Aead, KeyInit};
use xsalsa20poly1305::{Key, Nonce, XSalsa20Poly1305};

/// Domain separator for the password KDF. Changing this invalidates every
/// existing key file, so it carries a version suffix.
const KDF_CONTEXT: &str = "cw20-kit key file encryption v1";

const NONCE_LEN: usize = 24;

/// On-disk key file layout
#[derive(Serialize, Deserialize)]
struct KeyFile {
    version: u32,
    kdf: String,
    cipher: String,
    nonce: String,
    ciphertext: String,
}

/// A mnemonic-derived signing key bound to a network's address prefix
pub struct Wallet {
    mnemonic: Mnemonic,
    signing_key: SigningKey,
    address: String,
}

impl Wallet {
    /// Generate a wallet from a fresh 12-word mnemonic
    ///
    /// # Errors
    ///
    /// Returns an error if the configured derivation path is invalid.
    pub fn generate(config: &NetworkConfig) -> Result<Self, WalletError> {
        let mnemonic = Mnemonic::generate_in(Language::English, 12)
            .map_err(|e| WalletError::Mnemonic(e.to_string()))?;
        Self::from_parts(mnemonic, config)
    }

    /// Recover a wallet from an existing mnemonic phrase
    ///
    /// # Errors
    ///
    /// Returns an error if the phrase is not a valid BIP-39 mnemonic or the
    /// configured derivation path is invalid.
    pub fn from_mnemonic(phrase: &str, config: &NetworkConfig) -> Result<Self, WalletError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.trim())
            .map_err(|e| WalletError::Mnemonic(e.to_string()))?;
        Self::from_parts(mnemonic, config)
    }

    fn from_parts(mnemonic: Mnemonic, config: &NetworkConfig) -> Result<Self, WalletError> {
        let path: DerivationPath = config
            .wallet
            .hd_path
            .parse()
            .map_err(|_| WalletError::DerivationPath(config.wallet.hd_path.clone()))?;

        let seed = mnemonic.to_seed("");
        let signing_key = SigningKey::derive_from_path(seed, &path)
            .map_err(|e| WalletError::KeyDerivation(e.to_string()))?;
        let address = signing_key
            .public_key()
            .account_id(&config.wallet.bech32_prefix)
            .map_err(|e| WalletError::KeyDerivation(e.to_string()))?
            .to_string();

        Ok(Self {
            mnemonic,
            signing_key,
            address,
        })
    }

    /// Attempt to load and decrypt a key file
    ///
    /// This is the explicit load half of [`Wallet::load_or_create`]: callers
    /// that must not silently generate a new key should use it directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, the JSON
    /// envelope is malformed, or the password does not decrypt it.
    pub fn try_load<P: AsRef<Path>>(
        path: P,
        password: &str,
        config: &NetworkConfig,
    ) -> Result<Self, WalletError> {
        let contents = std::fs::read_to_string(path)?;
        let record: KeyFile = serde_json::from_str(&contents)?;

        let nonce = BASE64.decode(&record.nonce).map_err(|_| WalletError::Decrypt)?;
        if nonce.len() != NONCE_LEN {
            return Err(WalletError::Decrypt);
        }
        let ciphertext = BASE64
            .decode(&record.ciphertext)
            .map_err(|_| WalletError::Decrypt)?;

        let key = blake3::derive_key(KDF_CONTEXT, password.as_bytes());
        let cipher = XSalsa20Poly1305::new(Key::from_slice(&key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
            .map_err(|_| WalletError::Decrypt)?;
        let phrase = String::from_utf8(plaintext).map_err(|_| WalletError::Decrypt)?;

        Self::from_mnemonic(&phrase, config)
    }

    /// Encrypt the mnemonic with `password` and write the key file
    ///
    /// Overwrites any existing file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption or the file write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P, password: &str) -> Result<(), WalletError> {
        let key = blake3::derive_key(KDF_CONTEXT, password.as_bytes());
        let cipher = XSalsa20Poly1305::new(Key::from_slice(&key));
        let nonce: [u8; NONCE_LEN] = rand::random();
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), self.mnemonic.to_string().as_bytes())
            .map_err(|_| WalletError::Encrypt)?;

        let record = KeyFile {
            version: 1,
            kdf: "blake3".to_string(),
            cipher: "xsalsa20poly1305".to_string(),
            nonce: BASE64.encode(nonce),
            ciphertext: BASE64.encode(ciphertext),
        };
        std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }

    /// Load the key file at `path`, or generate a fresh wallet and persist it
    ///
    /// Any load failure (missing file, malformed envelope, wrong password) is
    /// treated as "no wallet yet". A write failure after generation does
    /// propagate, so a returned wallet is always backed by a readable file.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails or the new key file cannot be
    /// written.
    pub fn load_or_create<P: AsRef<Path>>(
        path: P,
        password: &str,
        config: &NetworkConfig,
    ) -> Result<Self, WalletError> {
        let path = path.as_ref();
        match Self::try_load(path, password, config) {
            Ok(wallet) => Ok(wallet),
            Err(err) => {
                tracing::debug!(error = %err, "no usable key file, generating a fresh wallet");
                let wallet = Self::generate(config)?;
                wallet.save(path, password)?;
                tracing::info!(
                    address = %wallet.address(),
                    path = %path.display(),
                    "created new wallet"
                );
                Ok(wallet)
            }
        }
    }

    /// The bech32 account address
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The mnemonic phrase this wallet derives from
    #[must_use]
    pub fn mnemonic(&self) -> String {
        self.mnemonic.to_string()
    }

    /// The secp256k1 public key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        self.signing_key.public_key()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of debug output
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
