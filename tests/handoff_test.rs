mod common;

use assert2::{check, let_assert};
use common::IV_SIZE_USER_JS;
use rustdoc_impls::{
    Delivery, ImplementorRegistry, ImplementorTable, parse_implementors_script,
    render_implementors_script,
};
use std::sync::{Arc, Mutex};

fn iv_size_user_table() -> ImplementorTable {
    parse_implementors_script(IV_SIZE_USER_JS).expect("IvSizeUser script should decode")
}

#[test]
fn test_table_has_exactly_the_source_crates() {
    let table = iv_size_user_table();

    check!(table.crate_names().collect::<Vec<_>>() == vec!["cbc", "cipher"]);
    check!(table.get("cbc").map(<[_]>::len) == Some(2));
    check!(table.get("cipher").map(<[_]>::len) == Some(1));
}

#[test]
fn test_records_keep_source_order_and_structure() {
    let table = iv_size_user_table();
    let cbc = table.get("cbc").unwrap();

    let_assert!(Some(decryptor) = cbc[0].signature());
    check!(decryptor.self_path.as_deref() == Some("cbc::Decryptor"));
    check!(decryptor.trait_path.as_deref() == Some("crypto_common::IvSizeUser"));
    check!(decryptor.bounds == vec!["C: BlockDecryptMut + BlockCipher".to_string()]);

    let_assert!(Some(encryptor) = cbc[1].signature());
    check!(encryptor.self_path.as_deref() == Some("cbc::Encryptor"));
    check!(encryptor.bounds == vec!["C: BlockEncryptMut + BlockCipher".to_string()]);

    let_assert!(Some(wrapper) = table.get("cipher").unwrap()[0].signature());
    check!(wrapper.self_name == "StreamCipherCoreWrapper");
    check!(wrapper.trait_path.as_deref() == Some("cipher::IvSizeUser"));
    check!(wrapper.bounds.len() == 2);
}

#[test]
fn test_render_reproduces_rustdoc_output() {
    check!(render_implementors_script(&iv_size_user_table()) == IV_SIZE_USER_JS);
}

#[test]
fn test_registered_callback_receives_mapping_exactly_once() {
    let registry = ImplementorRegistry::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    registry.register(move |table| sink.lock().unwrap().push(table));

    check!(registry.load(iv_size_user_table()) == Delivery::Delivered);

    let calls = calls.lock().unwrap();
    check!(calls.len() == 1);
    check!(calls[0] == iv_size_user_table());
}

#[test]
fn test_unregistered_load_leaves_mapping_pending_until_consumed() {
    let registry = ImplementorRegistry::new();
    check!(registry.load(iv_size_user_table()) == Delivery::Deferred);
    check!(registry.pending() == Some(iv_size_user_table()));

    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let_assert!(
        Some(Delivery::Delivered) = registry.register(move |table| sink.lock().unwrap().push(table))
    );

    check!(calls.lock().unwrap().as_slice() == [iv_size_user_table()]);
    check!(registry.pending().is_none());
}

#[test]
fn test_loading_twice_does_not_duplicate_entries() {
    let deferred = ImplementorRegistry::new();
    deferred.load(iv_size_user_table());
    deferred.load(iv_size_user_table());
    let_assert!(Some(pending) = deferred.take_pending());
    check!(pending.len() == 3);

    let delivered = ImplementorRegistry::new();
    let last = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&last);
    delivered.register(move |table| *sink.lock().unwrap() = Some(table));
    delivered.load(iv_size_user_table());
    delivered.load(iv_size_user_table());
    check!(*last.lock().unwrap() == Some(iv_size_user_table()));
}
