//! # Integration Tests
//!
//! End-to-end tests across the workspace crates.
//!
//! Covers:
//! - Contract snapshots
//! - Config file -> loader -> multiplexer -> destinations
//! - Sharing one multiplexer across threads and tasks

#[cfg(test)]
mod contract_tests {
    use contracts::{DestinationKind, ErrorPolicy, MuxConfig};

    #[test]
    fn test_default_config_snapshot() {
        let config = MuxConfig::default();
        assert_eq!(config.version, contracts::ConfigVersion::V1);
        assert_eq!(config.policy, ErrorPolicy::Ignore);
        assert!(config.destinations.is_empty());
    }

    #[test]
    fn test_kind_names() {
        let names: Vec<_> = [
            DestinationKind::Log,
            DestinationKind::File,
            DestinationKind::Network,
            DestinationKind::Stdout,
        ]
        .iter()
        .map(|k| k.as_str())
        .collect();
        assert_eq!(names, ["log", "file", "network", "stdout"]);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::io::Write;
    use std::sync::Arc;
    use std::thread;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::ErrorPolicy;
    use writemux::{create_multiplexer, MemoryBuffer, Multiplexer, WriteMuxError};

    /// Config file -> ConfigLoader -> create_multiplexer -> writes land in both files
    #[test]
    fn test_e2e_config_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("nested/second.log");

        let toml = format!(
            r#"
policy = "propagate"

[[destinations]]
name = "first"
kind = "file"
[destinations.params]
path = "{}"

[[destinations]]
name = "second"
kind = "file"
[destinations.params]
path = "{}"

[[destinations]]
name = "trace"
kind = "log"
"#,
            first.display().to_string().replace('\\', "/"),
            second.display().to_string().replace('\\', "/"),
        );
        let config_path = dir.path().join("writemux.toml");
        fs::write(&config_path, toml).unwrap();

        let config = ConfigLoader::load_from_path(&config_path).unwrap();
        assert_eq!(config.policy, ErrorPolicy::Propagate);

        let (mux, registrations) = create_multiplexer(config).unwrap();
        assert_eq!(registrations.len(), 3);
        assert_eq!(mux.len(), 3);

        assert_eq!(mux.write(b"line one\n").unwrap(), 9);
        assert_eq!(mux.write(b"line two\n").unwrap(), 9);

        let trace = registrations.iter().find(|r| r.name == "trace").unwrap();
        assert!(mux.remove(&trace.handle).is_some());
        assert_eq!(mux.write(b"line three\n").unwrap(), 11);

        mux.close();
        assert!(mux.is_empty());
        assert!(matches!(mux.write(b"late"), Err(WriteMuxError::NoDestinations)));

        let expected = "line one\nline two\nline three\n";
        assert_eq!(fs::read_to_string(&first).unwrap(), expected);
        assert_eq!(fs::read_to_string(&second).unwrap(), expected);
    }

    /// Two buffers, remove one, keep writing
    #[test]
    fn test_e2e_two_buffers() {
        let mux = Multiplexer::propagating();
        let b1 = MemoryBuffer::new();
        let b2 = MemoryBuffer::new();

        let h1 = mux.add(b1.clone());
        let _h2 = mux.add(b2.clone());

        assert_eq!(mux.write(b"hi").unwrap(), 2);
        assert_eq!(b1.as_string(), "hi");
        assert_eq!(b2.as_string(), "hi");

        mux.remove(&h1);
        assert_eq!(mux.write(b"!").unwrap(), 1);
        assert_eq!(b1.as_string(), "hi");
        assert_eq!(b2.as_string(), "hi!");
    }

    /// A closed destination makes a propagating multiplexer fail with its handle
    #[test]
    fn test_e2e_propagate_failure_names_destination() {
        let mux = Multiplexer::propagating();
        let broken = MemoryBuffer::new();
        let handle = mux.add(broken.clone());

        let mut detached = broken.clone();
        writemux::Destination::close(&mut detached).unwrap();

        let err = mux.write(b"data").unwrap_err();
        assert_eq!(err.handle(), Some(&handle));
        assert!(err.to_string().contains(handle.as_str()));

        // Same setup under ignore succeeds
        let ignoring = Multiplexer::new(ErrorPolicy::Ignore);
        ignoring.add(broken);
        assert_eq!(ignoring.write(b"data").unwrap(), 4);
    }

    /// JSON config round trip drives the same multiplexer
    #[test]
    fn test_e2e_json_config() {
        let json = r#"{
            "policy": "ignore",
            "destinations": [
                { "name": "a", "kind": "log" },
                { "name": "b", "kind": "log" }
            ]
        }"#;
        let config = ConfigLoader::load_from_str(json, ConfigFormat::Json).unwrap();
        let toml = ConfigLoader::to_toml(&config).unwrap();
        let reloaded = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        let (mux, registrations) = create_multiplexer(reloaded).unwrap();
        let names: Vec<_> = registrations.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(mux.write(b"xyz").unwrap(), 3);
        assert!(mux.metrics().iter().all(|(_, m)| m.write_count == 1));
    }

    /// Nested multiplexer behind std::io::Write
    #[test]
    fn test_e2e_nested_io_write() {
        let inner = Multiplexer::propagating();
        let leaf = MemoryBuffer::new();
        inner.add(leaf.clone());

        let outer = Multiplexer::propagating();
        let direct = MemoryBuffer::new();
        outer.add(direct.clone());
        outer.add(inner);

        let mut writer = &outer;
        write!(writer, "{}-{}", 4, 2).unwrap();
        writer.flush().unwrap();

        assert_eq!(leaf.as_string(), "4-2");
        assert_eq!(direct.as_string(), "4-2");

        outer.close();
        assert!(leaf.is_closed());
        assert!(direct.is_closed());
    }

    /// Writers on several threads, membership churn on another
    #[test]
    fn test_e2e_shared_across_threads() {
        let mux = Arc::new(Multiplexer::ignoring());
        let sink = MemoryBuffer::new();
        mux.add(sink.clone());

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let mux = Arc::clone(&mux);
                thread::spawn(move || {
                    for _ in 0..250 {
                        mux.write(b"ab").unwrap();
                    }
                })
            })
            .collect();

        let churn = {
            let mux = Arc::clone(&mux);
            thread::spawn(move || {
                for _ in 0..100 {
                    let h = mux.add(MemoryBuffer::new());
                    mux.remove(&h);
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        churn.join().unwrap();

        // Every write is atomic with respect to the registry, never interleaved
        assert_eq!(sink.len(), 4 * 250 * 2);
        assert!(sink.as_string().as_bytes().chunks(2).all(|c| c == b"ab"));
        assert_eq!(mux.len(), 1);
    }

    /// The multiplexer is usable from async tasks
    #[tokio::test]
    async fn test_e2e_from_tokio_tasks() {
        let mux = Arc::new(Multiplexer::propagating());
        let sink = MemoryBuffer::new();
        mux.add(sink.clone());

        let mut handles = Vec::new();
        for i in 0..8u8 {
            let mux = Arc::clone(&mux);
            handles.push(tokio::spawn(async move { mux.write(&[b'0' + i]) }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), 1);
        }

        let mut bytes = sink.contents();
        bytes.sort_unstable();
        assert_eq!(bytes, b"01234567");
    }
}

#[cfg(test)]
mod observability_tests {
    use std::time::Duration;

    use observability::WriteStatsAggregator;

    #[test]
    fn test_aggregator_matches_mux_traffic() {
        let mux = writemux::Multiplexer::ignoring();
        mux.add(writemux::MemoryBuffer::new());

        let mut stats = WriteStatsAggregator::new();
        for chunk in [&b"abc"[..], b"de", b"f"] {
            let ok = mux.write(chunk).is_ok();
            stats.update(chunk.len(), Duration::from_micros(5), ok);
        }

        let summary = stats.summary();
        assert_eq!(summary.total_writes, 3);
        assert_eq!(summary.total_bytes, 6);
        assert_eq!(summary.failed_writes, 0);
        assert_eq!(mux.stats().write_count, 3);
    }
}
