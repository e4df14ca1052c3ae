//! # Page Round Trip Demo
//!
//! Walks through what an encrypted page codec does with the provider:
//! 1. Configure the process-wide provider
//! 2. Derive a database key from a passphrase
//! 3. Encrypt and authenticate one page
//! 4. Verify and decrypt it again
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=page_crypto_provider=trace cargo run --example page_roundtrip
//! ```

use page_crypto_provider::{setup, CipherMode, HmacAlgorithm, ProviderConfig, Status};

const PAGE_SIZE: usize = 4096;
const KDF_ITER: u32 = 256_000;

fn check(step: &str, status: Status) {
    if !status.is_ok() {
        eprintln!("   {} failed (status {})", step, status.code());
        std::process::exit(1);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_crypto_provider=info".into()),
        )
        .init();

    println!("=== Page Crypto Provider: Page Round Trip Demo ===\n");

    // =========================================================================
    // STEP 1: Configure the provider
    // =========================================================================
    println!("Step 1: Configuring provider...");
    let config = ProviderConfig {
        verbose_logging: true,
        ..Default::default()
    };
    let provider = match setup(&config) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("   setup failed: {}", e);
            std::process::exit(1);
        }
    };
    match provider.info().and_then(|info| info.to_json()) {
        Ok(json) => println!("   {}\n", json),
        Err(e) => println!("   info unavailable: {}\n", e),
    }

    let mut ctx = match provider.ctx_init() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("   ctx_init failed: {}", e);
            std::process::exit(1);
        }
    };

    // =========================================================================
    // STEP 2: Derive the database key
    // =========================================================================
    println!("Step 2: Deriving key with PBKDF2-HMAC-SHA512 ({} iterations)...", KDF_ITER);
    let mut salt = [0u8; 16];
    check("salt", provider.random(&mut ctx, &mut salt));
    let mut key = vec![0u8; provider.get_key_sz()];
    check(
        "kdf",
        provider.kdf(
            &mut ctx,
            HmacAlgorithm::Sha512.id(),
            b"correct horse battery staple",
            &salt,
            KDF_ITER,
            &mut key,
        ),
    );
    println!("   Salt: {}", hex::encode(salt));
    println!("   Key derived ({} bytes)\n", key.len());

    // =========================================================================
    // STEP 3: Encrypt and authenticate a page
    // =========================================================================
    println!("Step 3: Encrypting page 1...");
    let mut page = vec![0u8; PAGE_SIZE];
    let text = b"SQLite format 3\0 and some table rows";
    page[..text.len()].copy_from_slice(text);

    let mut iv = vec![0u8; provider.get_iv_sz()];
    check("iv", provider.random(&mut ctx, &mut iv));

    let mut encrypted = vec![0u8; PAGE_SIZE];
    check(
        "encrypt",
        provider.cipher(&mut ctx, CipherMode::Encrypt.id(), &key, &iv, &page, &mut encrypted),
    );

    let pgno = 1u32.to_le_bytes();
    let mut tag = vec![0u8; provider.get_hmac_sz(HmacAlgorithm::Sha512.id())];
    check(
        "hmac",
        provider.hmac(
            &mut ctx,
            HmacAlgorithm::Sha512.id(),
            &key,
            Some(&encrypted[..]),
            Some(&pgno[..]),
            &mut tag,
        ),
    );
    println!("   IV:  {}", hex::encode(&iv));
    println!("   Tag: {}...\n", &hex::encode(&tag)[..32]);

    // =========================================================================
    // STEP 4: Verify and decrypt
    // =========================================================================
    println!("Step 4: Verifying and decrypting...");
    let mut verify = vec![0u8; tag.len()];
    check(
        "verify",
        provider.hmac(
            &mut ctx,
            HmacAlgorithm::Sha512.id(),
            &key,
            Some(&encrypted[..]),
            Some(&pgno[..]),
            &mut verify,
        ),
    );
    println!("   Tag matches: {}", verify == tag);

    let mut decrypted = vec![0u8; PAGE_SIZE];
    check(
        "decrypt",
        provider.cipher(&mut ctx, CipherMode::Decrypt.id(), &key, &iv, &encrypted, &mut decrypted),
    );
    println!("   Page restored: {}", decrypted == page);
    println!("   Prefix: {:?}\n", String::from_utf8_lossy(&decrypted[..15]));

    check("ctx_free", provider.ctx_free(ctx));
    println!("=== Demo Complete ===");
}
