use proptest::prelude::*;

use procharness::exec::copier::{CloseMode, StreamCopier};

fn copy_blocking(copier: StreamCopier, data: &[u8]) -> (u64, Vec<u8>) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    rt.block_on(async {
        let mut sink = Vec::new();
        let copied = copier.copy(&mut &data[..], &mut sink).await.unwrap();
        (copied, sink)
    })
}

proptest! {
    #[test]
    fn copy_preserves_bytes_for_any_buffer_size(
        data in proptest::collection::vec(any::<u8>(), 0..20_000),
        buffer_size in 1usize..10_000,
        close in prop_oneof![Just(CloseMode::KeepOpen), Just(CloseMode::Close)],
    ) {
        let copier = StreamCopier::new(buffer_size, close);
        let (copied, sink) = copy_blocking(copier, &data);

        prop_assert_eq!(copied, data.len() as u64);
        prop_assert_eq!(sink, data);
    }
}
