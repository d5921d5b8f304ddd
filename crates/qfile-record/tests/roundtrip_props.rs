use std::io::Cursor;

use bytes::BytesMut;
use proptest::prelude::*;
use qfile_record::varint::{decode_length, encode_length, length_size};
use qfile_record::{rec_type, ReadFlags, RecordReader, RecordWriter};
use qfile_stream::MemoryStream;

proptest! {
    #[test]
    fn any_record_reads_back(rec_type in any::<u8>(), payload in proptest::collection::vec(any::<u8>(), 0..600)) {
        let mut writer = RecordWriter::new(MemoryStream::new("prop"));
        prop_assert_eq!(writer.write_record(rec_type, &payload).unwrap(), rec_type);

        let mut stream = writer.into_inner();
        stream.set_position(0);
        let mut reader = RecordReader::new(stream);
        let record = reader.read_record_raw(ReadFlags::NONE).unwrap().unwrap();

        prop_assert_eq!(record.rec_type, rec_type);
        prop_assert_eq!(record.payload.as_ref(), payload.as_slice());
        prop_assert!(reader.read_record_raw(ReadFlags::NONE).unwrap().is_none());
    }

    #[test]
    fn ordinary_types_survive_full_transparency(
        records in proptest::collection::vec(
            (any::<u8>().prop_filter("codec-handled type", |t| {
                ![rec_type::PTR, rec_type::DTXT, rec_type::END].contains(t)
            }), proptest::collection::vec(any::<u8>(), 0..64)),
            0..20,
        )
    ) {
        let mut writer = RecordWriter::new(MemoryStream::new("prop-seq"));
        for (t, payload) in &records {
            writer.write_record(*t, payload).unwrap();
        }

        let mut stream = writer.into_inner();
        stream.set_position(0);
        let mut reader = RecordReader::new(stream);
        let got: Vec<(u8, Vec<u8>)> = reader
            .records(ReadFlags::DEFAULT)
            .map(|r| r.map(|r| (r.rec_type, r.payload.to_vec())))
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(got, records);
    }

    #[test]
    fn length_encoding_is_minimal(length in any::<usize>()) {
        let mut buf = BytesMut::new();
        encode_length(length, &mut buf);

        let bits = usize::BITS - length.leading_zeros();
        let expected = std::cmp::max(1, bits.div_ceil(7) as usize);
        prop_assert_eq!(buf.len(), expected);
        prop_assert_eq!(length_size(length), expected);

        let (last, rest) = buf.split_last().unwrap();
        prop_assert_eq!(last & 0x80, 0);
        prop_assert!(rest.iter().all(|b| b & 0x80 != 0));
        prop_assert_eq!(decode_length(&mut Cursor::new(buf.to_vec())).unwrap(), length);
    }

    #[test]
    fn padding_meets_minimum(min_size in 0usize..5000) {
        let mut writer = RecordWriter::new(MemoryStream::new("pad"));
        writer.write_padding(rec_type::DTXT, min_size).unwrap();
        let written = writer.into_inner().into_inner().len();
        prop_assert!(written >= min_size);
    }
}
