table! {
    kv_entries (entry_key) {
        entry_key -> Text,
        entry_value -> Text,
    }
}
