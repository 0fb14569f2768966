use crate::{
    connection::{CompletionErrorCode, NetFn, ResponseUnavailableReason},
    repository::Recovery,
    storage::sdr::{Record, RecordId, RecordType},
    Ipmi, IpmiError, SdrConfig,
};

use super::{config, make_record, session, MockError, Repository};

fn repository() -> Repository {
    Repository::new(vec![
        make_record(0x0000, RecordType::FullSensor, 43),
        make_record(0x0001, RecordType::CompactSensor, 27),
        make_record(0x0002, RecordType::FruDeviceLocator, 11),
    ])
}

type ReadResult = Result<Record, crate::Error<MockError>>;

fn first_record(repository: Repository) -> (ReadResult, Ipmi<Repository>) {
    let mut ipmi = session(repository);
    let record = ipmi.get_device_sdr(RecordId::FIRST, None);
    (record, ipmi)
}

#[test]
fn chunked_read_matches_record() {
    // Payload lengths: header only, shorter than one chunk, a multiple of
    // both 20 and 8, and two lengths that end in a partial chunk.
    for payload_len in [0, 15, 40, 43, 60] {
        let expected = make_record(0x0000, RecordType::FullSensor, payload_len);

        for max_response in [5, 8, 10, 16, 20, 64] {
            let mut repository = Repository::new(vec![expected.clone()]);
            repository.max_response = max_response;

            let (record, mut ipmi) = first_record(repository);
            let record = record.unwrap();

            assert_eq!(
                record.to_bytes(),
                expected,
                "payload {payload_len}, max response {max_response}"
            );
            assert!(record.is_last());
            assert!(ipmi.max_chunk_length() <= max_response as u8);

            let reads = ipmi.inner_mut().sdr_reads();
            assert!(reads.iter().all(|(_, _, _, len)| *len != 0));
            if payload_len == 0 {
                assert_eq!(reads, vec![(1, 0, 0, 5)]);
            }
        }
    }
}

#[test]
fn first_chunks_use_header_and_session_length() {
    let (record, mut ipmi) = first_record(repository());
    record.unwrap();

    assert_eq!(
        ipmi.inner_mut().sdr_reads(),
        vec![(1, 0, 0, 5), (1, 0, 5, 20), (1, 0, 25, 20), (1, 0, 45, 3)]
    );
}

#[test]
fn later_chunks_use_id_from_header() {
    let repository = Repository::new(vec![make_record(0x0010, RecordType::Oem, 30)]);

    let (record, mut ipmi) = first_record(repository);
    let record = record.unwrap();

    assert_eq!(record.id(), RecordId::new_raw(0x0010));
    assert!(record.is_last());

    let reads = ipmi.inner_mut().sdr_reads();
    assert_eq!(reads[0].1, 0x0000);
    assert!(reads[1..].iter().all(|(_, id, _, _)| *id == 0x0010));
}

#[test]
fn excess_chunk_bytes_are_ignored() {
    let mut repository = repository();
    repository.excess = 3;

    let (record, _) = first_record(repository);

    assert_eq!(
        record.unwrap().to_bytes(),
        make_record(0x0000, RecordType::FullSensor, 43)
    );
}

#[test]
fn chunk_length_shrinks_and_persists() {
    let mut repository = repository();
    repository.max_response = 10;

    let mut ipmi = session(repository);

    ipmi.get_device_sdr(RecordId::FIRST, None).unwrap();
    assert_eq!(ipmi.max_chunk_length(), 8);

    let lengths: Vec<u8> = ipmi.inner_mut().sdr_reads()[1..4]
        .iter()
        .map(|(_, _, _, len)| *len)
        .collect();
    assert_eq!(lengths, vec![20, 16, 12]);

    ipmi.inner_mut().requests.clear();
    ipmi.get_device_sdr(RecordId::new_raw(0x0001), None).unwrap();

    // No rejected reads for the second record.
    let reads = ipmi.inner_mut().sdr_reads();
    assert_eq!(reads[1].3, 8);
    assert!(reads.iter().all(|(_, _, _, len)| *len <= 8));

    ipmi.reset_max_chunk_length();
    assert_eq!(ipmi.max_chunk_length(), 20);
}

#[test]
fn shrinking_to_zero_gives_up() {
    let mut repository = repository();
    repository.faults = [0x00, 0xCA, 0xCA, 0xCA, 0xCA, 0xCA].into();

    let (record, mut ipmi) = first_record(repository);

    let error = record.unwrap_err();
    assert!(error.is_retries_exhausted());
    assert_eq!(ipmi.max_chunk_length(), 0);

    let lengths: Vec<u8> = ipmi
        .inner_mut()
        .sdr_reads()
        .iter()
        .map(|(_, _, _, len)| *len)
        .collect();
    assert_eq!(lengths, vec![5, 20, 16, 12, 8, 4]);
}

#[test]
fn assembly_budget_is_bounded() {
    let mut repository = repository();
    repository.faults = std::iter::once(0x00)
        .chain(std::iter::repeat(0xCA).take(30))
        .collect();

    let config = SdrConfig {
        chunk_length_step: 0,
        ..config()
    };
    let mut ipmi = Ipmi::with_config(repository, config);

    let error = ipmi.get_device_sdr(RecordId::FIRST, None).unwrap_err();

    assert_eq!(
        error,
        IpmiError::RetriesExhausted {
            netfn: NetFn::SensorEvent,
            cmd: 0x21,
            attempts: 20
        }
    );
    assert_eq!(ipmi.inner_mut().sdr_reads().len(), 21);
}

#[test]
fn timeouts_are_retried_five_times() {
    let mut repository = repository();
    repository.faults = [0x00, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3].into();

    let (record, mut ipmi) = first_record(repository);

    assert_eq!(
        record.unwrap_err(),
        IpmiError::RetriesExhausted {
            netfn: NetFn::SensorEvent,
            cmd: 0x21,
            attempts: 5
        }
    );

    // The header read, then five attempts at the first chunk.
    assert_eq!(ipmi.inner_mut().sdr_reads().len(), 6);
}

#[test]
fn transient_codes_recover() {
    let mut repository = repository();
    repository.faults = [0xC3, 0x00, 0xCE, 0xCE].into();

    let (record, mut ipmi) = first_record(repository);

    assert_eq!(
        record.unwrap().to_bytes(),
        make_record(0x0000, RecordType::FullSensor, 43)
    );
    assert_eq!(ipmi.inner_mut().reservations, 1);
}

#[test]
fn sdr_update_in_progress_is_not_retried() {
    let mut repository = repository();
    repository.faults = [0x00, 0xD0].into();

    let (record, mut ipmi) = first_record(repository);
    let error = record.unwrap_err();

    assert_eq!(
        error,
        IpmiError::Failed {
            netfn: NetFn::SensorEvent,
            cmd: 0x21,
            completion_code: CompletionErrorCode::ResponseUnavailable {
                reason: ResponseUnavailableReason::SDRInUpdate
            },
            data: Vec::new(),
        }
    );
    assert_eq!(ipmi.inner_mut().sdr_reads().len(), 2);
}

#[test]
fn sdr_update_retry_is_opt_in() {
    let mut repository = repository();
    repository.faults = [0x00, 0xD0, 0xD0].into();

    let config = config().with_recovery(
        CompletionErrorCode::ResponseUnavailable {
            reason: ResponseUnavailableReason::SDRInUpdate,
        },
        Recovery::Backoff,
    );
    let mut ipmi = Ipmi::with_config(repository, config);

    let record = ipmi.get_device_sdr(RecordId::FIRST, None).unwrap();

    assert_eq!(
        record.to_bytes(),
        make_record(0x0000, RecordType::FullSensor, 43)
    );
}

#[test]
fn cancelled_reservation_is_renewed() {
    let mut repository = repository();
    repository.faults = [0x00, 0xC5].into();

    let (record, mut ipmi) = first_record(repository);
    record.unwrap();

    let repository = ipmi.inner_mut();
    assert_eq!(repository.reservations, 2);

    let reads = repository.sdr_reads();
    assert_eq!(reads[1].0, 1);
    assert!(reads[2..].iter().all(|(res, _, _, _)| *res == 2));
}

#[test]
fn fatal_code_is_not_retried() {
    let mut repository = repository();
    repository.faults = [0x00, 0xCC].into();

    let (record, mut ipmi) = first_record(repository);
    let error = record.unwrap_err();

    assert_eq!(
        error.completion_code(),
        Some(CompletionErrorCode::InvalidDataFieldInRequest)
    );
    assert!(matches!(error, IpmiError::Failed { cmd: 0x21, .. }));
    assert_eq!(ipmi.inner_mut().sdr_reads().len(), 2);
}

#[test]
fn missing_record() {
    let mut ipmi = session(repository());

    let error = ipmi
        .get_device_sdr(RecordId::new_raw(0x0042), None)
        .unwrap_err();

    assert_eq!(
        error.completion_code(),
        Some(CompletionErrorCode::RequestedDatapointNotPresent)
    );
}

#[test]
fn explicit_reservation_is_used() {
    let mut repository = repository();
    repository.reservation = 0x1234;

    let mut ipmi = session(repository);
    let reservation = core::num::NonZeroU16::new(0x1234);

    ipmi.get_device_sdr(RecordId::FIRST, reservation).unwrap();

    let repository = ipmi.inner_mut();
    assert_eq!(repository.reservations, 0);
    assert!(repository
        .sdr_reads()
        .iter()
        .all(|(res, _, _, _)| *res == 0x1234));
}

#[test]
fn renewed_reservation_is_handed_back() {
    let mut repository = repository();
    repository.reservation = 0x1234;
    repository.faults = [0x00, 0xC5].into();

    let mut ipmi = session(repository);
    let mut reservation = core::num::NonZeroU16::new(0x1234).unwrap();

    ipmi.read_device_sdr(RecordId::FIRST, &mut reservation).unwrap();
    assert_eq!(reservation.get(), 0x1235);

    ipmi.read_device_sdr(RecordId::new_raw(0x0001), &mut reservation).unwrap();

    let repository = ipmi.inner_mut();
    assert_eq!(repository.reservations, 1);
    assert!(repository.sdr_reads()[2..]
        .iter()
        .all(|(res, _, _, _)| *res == 0x1235));
}

#[test]
fn connection_errors_are_passed_through() {
    let mut repository = repository();
    repository.disconnected = true;

    let (record, _) = first_record(repository);

    assert_eq!(
        record.unwrap_err(),
        IpmiError::Connection(MockError::Disconnected)
    );
}

#[test]
fn enumerates_all_records() {
    let mut ipmi = session(repository());

    let records = ipmi.get_device_sdr_list().unwrap();

    let ids: Vec<u16> = records.iter().map(|r| r.id().value()).collect();
    assert_eq!(ids, vec![0x0000, 0x0001, 0x0002]);
    assert_eq!(
        records[2].to_bytes(),
        make_record(0x0002, RecordType::FruDeviceLocator, 11)
    );
    assert!(records[2].is_last());

    let repository = ipmi.inner_mut();
    assert_eq!(repository.reservations, 1);
    assert!(repository
        .sdr_reads()
        .iter()
        .all(|(_, id, _, _)| *id != 0xFFFF));
}

#[test]
fn iterator_is_lazy() {
    let mut ipmi = session(repository());

    let mut iter = ipmi.device_sdr_entries();
    assert_eq!(iter.next_id(), Some(RecordId::FIRST));

    let first = iter.next().unwrap().unwrap();
    assert_eq!(first.ty(), RecordType::FullSensor);
    assert_eq!(iter.next_id(), Some(RecordId::new_raw(0x0001)));
    drop(iter);

    let reads = ipmi.inner_mut().sdr_reads();
    assert!(reads.iter().all(|(_, id, _, _)| *id == 0x0000));
}

#[test]
fn iterator_stops_after_error() {
    let mut repository = repository();
    repository.faults = [0xC1].into();

    let mut ipmi = session(repository);
    let mut iter = ipmi.sdrs();

    assert!(iter.next().unwrap().is_err());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn duplicate_next_id_stops_enumeration() {
    let repository = repository().with_next_id(0x0001, 0x0001);
    let mut ipmi = session(repository);

    let records = ipmi.get_device_sdr_list().unwrap();

    let ids: Vec<u16> = records.iter().map(|r| r.id().value()).collect();
    assert_eq!(ids, vec![0x0000, 0x0001]);
}

#[test]
fn empty_repository() {
    let mut ipmi = session(Repository::new(Vec::new()));

    let mut iter = ipmi.sdrs();
    let error = iter.next().unwrap().unwrap_err();

    assert_eq!(
        error.completion_code(),
        Some(CompletionErrorCode::RequestedDatapointNotPresent)
    );
    assert!(iter.next().is_none());
}

#[test]
fn reads_fixture_record() {
    let fixture = hex::decode("040051c00904111e2b3845525f6c").unwrap();
    let mut ipmi = session(Repository::new(vec![fixture.clone()]));

    let record = ipmi.get_device_sdr(RecordId::FIRST, None).unwrap();

    assert_eq!(record.id(), RecordId::new_raw(0x0004));
    assert_eq!(record.ty(), RecordType::Oem);
    assert_eq!(record.header.sdr_version_major, 1);
    assert_eq!(record.header.sdr_version_minor, 5);
    assert_eq!(record.payload.len(), 9);
    assert_eq!(record.to_bytes(), fixture);
}
