//! End-to-end integration tests for ripple-sign-serialize.
//!
//! These tests exercise the full lifecycle from key creation through signed
//! output: key files on disk, transactions from JSON and binary, single and
//! multi signing, verification, and feeding signed output back in.
//!
//! Each test stands alone with its own temporary directory.

use serde_json::{json, Value};

use ripple_sign_serialize::codec::fields::{self, ACCOUNT, SIGNERS, TXN_SIGNATURE};
use ripple_sign_serialize::codec::{parse_binary, to_binary, Amount, FieldValue};
use ripple_sign_serialize::crypto::{AccountId, KeyType, SigningKey};
use ripple_sign_serialize::keyfile;
use ripple_sign_serialize::object::{parse_json, to_json};
use ripple_sign_serialize::tool;
use ripple_sign_serialize::transaction::{
    multi_sign, single_sign, transaction_id, verify_signatures, SignError, TransactionBuilder,
    TransactionType,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const GATEWAY: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

fn offer_create(account: &str) -> Value {
    json!({
        "TransactionType": "OfferCreate",
        "Account": account,
        "Fee": "12",
        "Flags": 0,
        "Sequence": 1402,
        "LastLedgerSequence": 8_007_750,
        "OfferSequence": 1401,
        "TakerGets": "15000000000",
        "TakerPays": {
            "currency": "USD",
            "issuer": GATEWAY,
            "value": "7072.8",
        },
        "SigningPubKey": "",
    })
}

fn payment_with_paths(account: &str) -> Value {
    json!({
        "TransactionType": "Payment",
        "Account": account,
        "Destination": GATEWAY,
        "Amount": {"currency": "EUR", "issuer": GATEWAY, "value": "-0.0001"},
        "SendMax": "1000",
        "Fee": "10",
        "Sequence": 7,
        "DestinationTag": 42,
        "InvoiceID": "6F1DFD1D0FE8A32E40E1F2C05CF1C15545BAB56B617F9C6C2D63A6B704BEF59B",
        "Paths": [
            [{"currency": "USD", "issuer": GATEWAY}],
            [{"account": GATEWAY}, {"currency": "XRP"}],
        ],
        "Memos": [
            {"Memo": {"MemoType": "687474703A2F2F6578616D706C652E636F6D2F6D656D6F2F67656E65726963", "MemoData": "72656E74"}},
        ],
    })
}

fn generated(key_type: KeyType) -> SigningKey {
    SigningKey::generate(key_type).unwrap()
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn json_binary_json_round_trip() {
    let account = generated(KeyType::Secp256k1).account_id().to_base58();
    for json in [offer_create(&account), payment_with_paths(&account)] {
        let obj = parse_json(&json).unwrap();
        let blob = to_binary(&obj).unwrap();
        let back = parse_binary(&blob).unwrap();
        assert_eq!(back, obj);
        assert_eq!(parse_json(&to_json(&back)).unwrap(), obj);
    }
}

#[test]
fn issued_value_text_is_canonical() {
    let account = generated(KeyType::Ed25519).account_id().to_base58();
    let obj = parse_json(&offer_create(&account)).unwrap();
    let json = to_json(&obj);
    assert_eq!(json["TakerPays"]["value"], "7072.8");
    assert_eq!(json["TakerPays"]["currency"], "USD");
    assert_eq!(json["TakerGets"], "15000000000");
}

#[test]
fn tool_serialize_deserialize_agree() {
    let account = generated(KeyType::Ed25519).account_id().to_base58();
    let text = offer_create(&account).to_string();
    let blob = tool::serialize_from_json(&text).unwrap();
    let json = tool::deserialize_to_json(&blob).unwrap();
    assert_eq!(json, serde_json::from_str::<Value>(&text).unwrap());
}

#[test]
fn deserialized_paths_serialize_to_the_same_blob() {
    let account = generated(KeyType::Ed25519).account_id().to_base58();
    let blob = tool::serialize_from_json(&payment_with_paths(&account).to_string()).unwrap();
    let json = tool::deserialize_to_json(&blob).unwrap();
    assert_eq!(json["Paths"][1][0]["account"], GATEWAY);
    assert_eq!(tool::serialize_from_json(&json.to_string()).unwrap(), blob);
}

// ---------------------------------------------------------------------------
// Key files
// ---------------------------------------------------------------------------

#[test]
fn key_file_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".ripple").join("secret-key.txt");

    let key = tool::create_key(Some("ed25519"), None).unwrap();
    keyfile::persist(&key, &path).unwrap();
    let loaded = keyfile::load(&path).unwrap();
    assert_eq!(loaded.key, key);
    assert_eq!(loaded.key.secret_key().as_bytes(), key.secret_key().as_bytes());
    assert!(!loaded.is_suspect());

    // An edited seed is picked up and every derived member follows.
    let mut record: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    record["master_seed"] = json!("masterpassphrase");
    std::fs::write(&path, record.to_string()).unwrap();

    let repaired = keyfile::load(&path).unwrap().key;
    let record = keyfile::persist(&repaired, &path).unwrap();
    assert_eq!(record.account_id, "rGWrZyQqhTp9Xu7G5Pkayo7bXjH4k4QYpf");
    assert_eq!(record, tool::repair_key_file(&repaired));
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

#[test]
fn single_sign_from_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("key.txt");
    keyfile::persist(&generated(KeyType::Secp256k1), &path).unwrap();
    let key = keyfile::load(&path).unwrap().key;

    let text = offer_create(&key.account_id().to_base58()).to_string();
    let signed = tool::sign_single(&text, &key).unwrap();

    let tx = tool::make_transaction(&signed.to_string()).unwrap();
    assert_eq!(verify_signatures(&tx), Ok(()));
    assert_eq!(signed["hash"], hex::encode_upper(transaction_id(&tx).unwrap()));
    assert_eq!(signed["SigningPubKey"], key.public_key().to_hex());
}

#[test]
fn resigning_overwrites_the_signature() {
    let first = generated(KeyType::Ed25519);
    let second = generated(KeyType::Secp256k1);
    let mut tx = parse_json(&offer_create(&first.account_id().to_base58())).unwrap();

    single_sign(&mut tx, &first).unwrap();
    let first_sig = tx.get_blob(TXN_SIGNATURE).unwrap().to_vec();
    single_sign(&mut tx, &second).unwrap();
    assert_ne!(tx.get_blob(TXN_SIGNATURE).unwrap(), &first_sig[..]);
    assert_eq!(verify_signatures(&tx), Ok(()));
}

#[test]
fn three_signers_in_any_order() {
    let owner = generated(KeyType::Secp256k1);
    let signers = [
        generated(KeyType::Secp256k1),
        generated(KeyType::Ed25519),
        generated(KeyType::Secp256k1),
    ];
    let base = parse_json(&payment_with_paths(&owner.account_id().to_base58())).unwrap();

    let mut results = Vec::new();
    for order in [[0, 1, 2], [2, 1, 0], [1, 0, 2]] {
        let mut tx = base.clone();
        for i in order {
            multi_sign(&mut tx, &signers[i]).unwrap();
        }
        assert_eq!(verify_signatures(&tx), Ok(()));
        results.push(tx);
    }
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);

    let accounts: Vec<AccountId> = results[0]
        .get_array(SIGNERS)
        .unwrap()
        .iter()
        .map(|entry| entry.object.get_account(ACCOUNT).unwrap())
        .collect();
    let mut sorted = accounts.clone();
    sorted.sort();
    assert_eq!(accounts, sorted);
    assert_eq!(accounts.len(), 3);
}

#[test]
fn multi_signed_binary_survives_round_trip() {
    let owner = generated(KeyType::Ed25519);
    let mut tx = TransactionBuilder::new(TransactionType::TrustSet)
        .account(owner.account_id())
        .fee(Amount::drops(15))
        .sequence(3)
        .set(
            fields::by_name("LimitAmount").unwrap().id,
            FieldValue::Amount(
                Amount::from_json(&json!({"currency": "USD", "issuer": GATEWAY, "value": "100"}))
                    .unwrap(),
            ),
        )
        .build()
        .unwrap();

    multi_sign(&mut tx, &generated(KeyType::Secp256k1)).unwrap();
    multi_sign(&mut tx, &generated(KeyType::Ed25519)).unwrap();

    let blob = hex::encode_upper(to_binary(&tx).unwrap());
    let back = tool::make_transaction(&blob).unwrap();
    assert_eq!(back, tx);
    assert_eq!(verify_signatures(&back), Ok(()));
}

#[test]
fn switching_from_multi_to_single() {
    let owner = generated(KeyType::Secp256k1);
    let mut tx = parse_json(&offer_create(&owner.account_id().to_base58())).unwrap();
    multi_sign(&mut tx, &generated(KeyType::Ed25519)).unwrap();
    single_sign(&mut tx, &owner).unwrap();
    assert!(!tx.contains(SIGNERS));
    assert_eq!(verify_signatures(&tx), Ok(()));
}

#[test]
fn tampering_any_signer_is_caught() {
    let owner = generated(KeyType::Secp256k1);
    let signer = generated(KeyType::Ed25519);
    let text = offer_create(&owner.account_id().to_base58()).to_string();
    let mut signed = tool::sign_multi(&text, &signer).unwrap();

    signed["Sequence"] = json!(1403);
    let tx = tool::make_transaction(&signed.to_string()).unwrap();
    assert_eq!(
        verify_signatures(&tx),
        Err(SignError::BadSignerSignature(signer.account_id()))
    );
}
