use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marksrc::target::MarkTarget;
use marksrc::MarkConfig;
use smoltcp::wire;

fn smol_build(buf: &mut [u8], payload_len: usize) {
    let mut ipv6_pkt = wire::Ipv6Packet::new_unchecked(&mut buf[0..40 + payload_len]);
    ipv6_pkt.set_version(6);
    ipv6_pkt.set_traffic_class(0);
    ipv6_pkt.set_flow_label(0);
    ipv6_pkt.set_payload_len(payload_len as u16);
    ipv6_pkt.set_next_header(wire::IpProtocol::Udp);
    ipv6_pkt.set_hop_limit(64);
    ipv6_pkt.set_src_addr(wire::Ipv6Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0x12, 0x34));
    ipv6_pkt.set_dst_addr(wire::Ipv6Address::new(0x2001, 0xdb8, 0xffff, 0, 0, 0, 0, 1));
}

pub fn b(c: &mut Criterion) {
    let prefix = "2001:db8::/96".parse().unwrap();
    let cfg = MarkConfig::new(prefix, 120, 0x1000).into_valid().unwrap();
    let target = MarkTarget::new(cfg);

    let mut buf = [0; 200];
    smol_build(&mut buf[..], 66);

    c.bench_function("mark_packet", |b| {
        b.iter(|| target.mark_packet(black_box(&buf[..106])).unwrap());
    });

    c.bench_function("apply", |b| {
        let mut mark = 0;
        b.iter(|| {
            target.apply(black_box(&buf[..106]), &mut mark).unwrap();
            black_box(mark)
        });
    });
}

criterion_group!(benches, b);
criterion_main!(benches);
