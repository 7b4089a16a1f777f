use super::*;

#[test]
fn test_intern_deduplicates() {
    let interner = NameInterner::new();
    let a = interner.intern("address");
    let b = interner.intern("address");
    assert_eq!(a, b);
    assert_eq!(&*interner.resolve(a), "address");
}

#[test]
fn test_atoms_are_dense_indices() {
    let interner = NameInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    assert_eq!(a, Atom(1));
    assert_eq!(b, Atom(2));
    assert_eq!(&*interner.resolve(b), "b");
    assert_eq!(interner.len(), 3);
}

#[test]
fn test_empty_string_is_none_atom() {
    let interner = NameInterner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(&*interner.resolve(Atom::NONE), "");
}

#[test]
fn test_unknown_atom_resolves_to_empty() {
    let interner = NameInterner::new();
    assert_eq!(interner.try_resolve(Atom(42)), None);
    assert_eq!(&*interner.resolve(Atom(42)), "");
}

#[test]
fn test_get_does_not_intern() {
    let interner = NameInterner::new();
    assert_eq!(interner.get("missing"), None);
    let atom = interner.intern("present");
    assert_eq!(interner.get("present"), Some(atom));
    assert_eq!(interner.get("missing"), None);
}

#[test]
fn test_builtins_are_seeded() {
    assert!(NameInterner::new().is_empty());

    let interner = NameInterner::with_builtins();
    assert!(!interner.is_empty());
    assert_eq!(interner.len(), BUILTIN_NAMES.len() + 1);
    assert!(interner.get("Date").is_some());
    assert!(interner.get("Partial").is_some());
    assert_eq!(interner.get("string"), Some(Atom(1)));
}

#[test]
fn test_concurrent_interning_agrees() {
    let interner = std::sync::Arc::new(NameInterner::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = interner.clone();
            std::thread::spawn(move || {
                (0..64)
                    .map(|i| interner.intern(&format!("field{i}")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<Atom>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();
    for other in &results[1..] {
        assert_eq!(&results[0], other);
    }
    assert_eq!(interner.len(), 65);
}

#[test]
fn test_poisoned_pool_keeps_interning() {
    let interner = std::sync::Arc::new(NameInterner::new());
    let before = interner.intern("before");

    let holder = interner.clone();
    let crashed = std::thread::spawn(move || {
        let _pool = holder.pool.write().unwrap();
        panic!("holder crashed");
    })
    .join();
    assert!(crashed.is_err());

    assert_eq!(interner.intern("before"), before);
    let after = interner.intern("after");
    assert_ne!(after, Atom::NONE);
    assert_eq!(&*interner.resolve(after), "after");
}
