//! Byte layouts of the five record types.

use super::layout::{RecordReader, RecordWriter};
use super::{InvalidDiscriminant, Record};
use crate::models::*;

impl Record for Patient {
    const SIZE: usize = 188;
    const AVAILABLE_COUNTER: bool = true;

    fn encode(&self, w: &mut RecordWriter<'_>) {
        w.i32(self.id)
            .text(self.name.as_bytes(), NAME_WIDTH)
            .i32(self.age)
            .i32(self.gender as i32)
            .text(self.phone.as_bytes(), PHONE_WIDTH)
            .text(self.address.as_bytes(), ADDRESS_WIDTH)
            .text(self.blood_group.as_bytes(), BLOOD_GROUP_WIDTH)
            .bool(self.active)
            .finish();
    }

    fn decode(r: &mut RecordReader<'_>) -> Result<Self, InvalidDiscriminant> {
        let id = r.i32();
        let name = r.text(NAME_WIDTH);
        let age = r.i32();
        let gender = r.i32();
        let gender = Gender::from_i32(gender).ok_or(InvalidDiscriminant {
            field: "gender",
            value: gender,
        })?;
        Ok(Patient {
            id,
            name,
            age,
            gender,
            phone: r.text(PHONE_WIDTH),
            address: r.text(ADDRESS_WIDTH),
            blood_group: r.text(BLOOD_GROUP_WIDTH),
            active: r.bool(),
        })
    }
}

impl Record for Doctor {
    const SIZE: usize = 160;
    const AVAILABLE_COUNTER: bool = true;

    fn encode(&self, w: &mut RecordWriter<'_>) {
        w.i32(self.id)
            .text(self.name.as_bytes(), NAME_WIDTH)
            .text(self.phone.as_bytes(), PHONE_WIDTH)
            .text(self.email.as_bytes(), EMAIL_WIDTH)
            .text(self.specialization.as_bytes(), SPECIALIZATION_WIDTH)
            .i32(self.room_number)
            .bool(self.on_duty)
            .bool(self.active)
            .finish();
    }

    fn decode(r: &mut RecordReader<'_>) -> Result<Self, InvalidDiscriminant> {
        Ok(Doctor {
            id: r.i32(),
            name: r.text(NAME_WIDTH),
            phone: r.text(PHONE_WIDTH),
            email: r.text(EMAIL_WIDTH),
            specialization: r.text(SPECIALIZATION_WIDTH),
            room_number: r.i32(),
            on_duty: r.bool(),
            active: r.bool(),
        })
    }
}

impl Record for Receptionist {
    const SIZE: usize = 124;
    const AVAILABLE_COUNTER: bool = true;

    fn encode(&self, w: &mut RecordWriter<'_>) {
        w.i32(self.id)
            .text(self.name.as_bytes(), NAME_WIDTH)
            .text(self.phone.as_bytes(), PHONE_WIDTH)
            .text(self.email.as_bytes(), EMAIL_WIDTH)
            .bool(self.on_duty)
            .bool(self.active)
            .finish();
    }

    fn decode(r: &mut RecordReader<'_>) -> Result<Self, InvalidDiscriminant> {
        Ok(Receptionist {
            id: r.i32(),
            name: r.text(NAME_WIDTH),
            phone: r.text(PHONE_WIDTH),
            email: r.text(EMAIL_WIDTH),
            on_duty: r.bool(),
            active: r.bool(),
        })
    }
}

impl Record for User {
    const SIZE: usize = 92;
    const AVAILABLE_COUNTER: bool = false;

    fn encode(&self, w: &mut RecordWriter<'_>) {
        w.i32(self.id)
            .text(self.username.as_bytes(), USERNAME_WIDTH)
            .text(self.password.as_bytes(), PASSWORD_WIDTH)
            .i32(self.role as i32)
            .bool(self.active)
            .finish();
    }

    fn decode(r: &mut RecordReader<'_>) -> Result<Self, InvalidDiscriminant> {
        let id = r.i32();
        let username = r.text(USERNAME_WIDTH);
        let password = ObfuscatedPassword::from_stored(r.bytes(PASSWORD_WIDTH));
        let role = r.i32();
        let role = Role::from_i32(role).ok_or(InvalidDiscriminant {
            field: "role",
            value: role,
        })?;
        Ok(User {
            id,
            username,
            password,
            role,
            active: r.bool(),
        })
    }
}

impl Record for Appointment {
    const SIZE: usize = 144;
    const AVAILABLE_COUNTER: bool = false;

    fn encode(&self, w: &mut RecordWriter<'_>) {
        w.i32(self.id)
            .i32(self.patient_id)
            .i32(self.doctor_id)
            .text(self.date.as_bytes(), DATE_WIDTH)
            .text(self.time_slot.as_bytes(), TIME_SLOT_WIDTH)
            .text(self.reason.as_bytes(), REASON_WIDTH)
            .i32(self.status as i32)
            .finish();
    }

    fn decode(r: &mut RecordReader<'_>) -> Result<Self, InvalidDiscriminant> {
        let id = r.i32();
        let patient_id = r.i32();
        let doctor_id = r.i32();
        let date = r.text(DATE_WIDTH);
        let time_slot = r.text(TIME_SLOT_WIDTH);
        let reason = r.text(REASON_WIDTH);
        let status = r.i32();
        let status = AppointmentStatus::from_i32(status).ok_or(InvalidDiscriminant {
            field: "status",
            value: status,
        })?;
        Ok(Appointment {
            id,
            patient_id,
            doctor_id,
            date,
            time_slot,
            reason,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{ByteOrder, LittleEndian};

    fn encode<T: Record>(record: &T) -> Vec<u8> {
        let mut buf = vec![0u8; T::SIZE];
        record.encode(&mut RecordWriter::new(&mut buf));
        buf
    }

    fn decode<T: Record>(buf: &[u8]) -> T {
        T::decode(&mut RecordReader::new(buf)).unwrap()
    }

    #[test]
    fn test_patient_layout() {
        let mut patient = Patient::new("Alice", 30, Gender::Female, "01712345678", "Dhaka", "A+");
        patient.id = 1001;
        let buf = encode(&patient);

        assert_eq!(LittleEndian::read_i32(&buf[0..4]), 1001);
        assert_eq!(&buf[4..10], b"Alice\0");
        assert_eq!(LittleEndian::read_i32(&buf[56..60]), 30);
        assert_eq!(LittleEndian::read_i32(&buf[60..64]), 1);
        assert_eq!(&buf[64..76], b"01712345678\0");
        assert_eq!(&buf[79..85], b"Dhaka\0");
        assert_eq!(&buf[179..182], b"A+\0");
        assert_eq!(buf[184], 1);
        assert_eq!(decode::<Patient>(&buf), patient);
    }

    #[test]
    fn test_doctor_layout() {
        let mut doctor = Doctor::new("Ana", "01812345678", "ana@clinic.org", "Cardiology", 12);
        doctor.id = 2001;
        doctor.on_duty = false;
        let buf = encode(&doctor);

        assert_eq!(&buf[54..66], b"01812345678\0");
        assert_eq!(&buf[69..83], b"ana@clinic.org");
        assert_eq!(&buf[119..129], b"Cardiology");
        assert_eq!(LittleEndian::read_i32(&buf[152..156]), 12);
        assert_eq!(buf[156], 0);
        assert_eq!(buf[157], 1);
        assert_eq!(decode::<Doctor>(&buf), doctor);
    }

    #[test]
    fn test_receptionist_layout() {
        let mut receptionist = Receptionist::new("Rita", "01912345678", "rita@clinic.org");
        receptionist.id = 4001;
        let buf = encode(&receptionist);

        assert_eq!(buf.len(), 124);
        assert_eq!(buf[119], 1);
        assert_eq!(buf[120], 1);
        assert_eq!(decode::<Receptionist>(&buf), receptionist);
    }

    #[test]
    fn test_user_layout_keeps_obfuscated_bytes() {
        let user = User::new(3001, "admin", "admin123", Role::Admin);
        let buf = encode(&user);

        assert_eq!(&buf[4..10], b"admin\0");
        assert_eq!(&buf[34..43], b"`elho032\0");
        assert_eq!(LittleEndian::read_i32(&buf[84..88]), 0);
        assert_eq!(buf[88], 1);

        let back = decode::<User>(&buf);
        assert!(back.password.matches("admin123"));
        assert_eq!(back, user);
    }

    #[test]
    fn test_appointment_layout() {
        let mut appt = Appointment::new(1001, 2001, "01-01-2025", "10:00 AM", "Checkup");
        appt.id = 5001;
        appt.status = AppointmentStatus::Confirmed;
        let buf = encode(&appt);

        assert_eq!(LittleEndian::read_i32(&buf[4..8]), 1001);
        assert_eq!(LittleEndian::read_i32(&buf[8..12]), 2001);
        assert_eq!(&buf[12..23], b"01-01-2025\0");
        assert_eq!(&buf[27..36], b"10:00 AM\0");
        assert_eq!(&buf[37..45], b"Checkup\0");
        assert_eq!(LittleEndian::read_i32(&buf[140..144]), 1);
        assert_eq!(decode::<Appointment>(&buf), appt);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let appt = Appointment::new(1001, 2001, "01-01-2025", "10:00 AM", "Checkup");
        let mut buf = encode(&appt);
        LittleEndian::write_i32(&mut buf[140..144], 9);

        let err = Appointment::decode(&mut RecordReader::new(&buf)).unwrap_err();
        assert_eq!(err.field, "status");
        assert_eq!(err.value, 9);
    }
}
