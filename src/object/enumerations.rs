//! Enumerations used as discriminators and enumerated property values.
//!
//! Every enumeration keeps unknown wire values (see
//! [`generate_custom_enum!`](crate::generate_custom_enum)), so vendor
//! extensions decode and re-encode unchanged.

use crate::generate_custom_enum;

generate_custom_enum! {
    /// BACnet object types (clause 21, BACnetObjectType)
    ObjectType {
        AnalogInput = 0,
        AnalogOutput = 1,
        AnalogValue = 2,
        BinaryInput = 3,
        BinaryOutput = 4,
        BinaryValue = 5,
        Calendar = 6,
        Command = 7,
        Device = 8,
        EventEnrollment = 9,
        File = 10,
        Group = 11,
        Loop = 12,
        MultiStateInput = 13,
        MultiStateOutput = 14,
        NotificationClass = 15,
        Program = 16,
        Schedule = 17,
        Averaging = 18,
        MultiStateValue = 19,
        TrendLog = 20,
        LifeSafetyPoint = 21,
        LifeSafetyZone = 22,
        Accumulator = 23,
        PulseConverter = 24,
        EventLog = 25,
        GlobalGroup = 26,
        TrendLogMultiple = 27,
        LoadControl = 28,
        StructuredView = 29,
        AccessDoor = 30,
        Timer = 31,
        AccessCredential = 32,
        AccessPoint = 33,
        AccessRights = 34,
        AccessUser = 35,
        AccessZone = 36,
        CredentialDataInput = 37,
        NetworkSecurity = 38,
        BitstringValue = 39,
        CharacterstringValue = 40,
        DatePatternValue = 41,
        DateValue = 42,
        DatetimePatternValue = 43,
        DatetimeValue = 44,
        IntegerValue = 45,
        LargeAnalogValue = 46,
        OctetstringValue = 47,
        PositiveIntegerValue = 48,
        TimePatternValue = 49,
        TimeValue = 50,
        NotificationForwarder = 51,
        AlertEnrollment = 52,
        Channel = 53,
        LightingOutput = 54,
        BinaryLightingOutput = 55,
        NetworkPort = 56,
        ElevatorGroup = 57,
        Escalator = 58,
        Lift = 59,
        Staging = 60,
        AuditLog = 61,
        AuditReporter = 62,
        Color = 63,
        ColorTemperature = 64,
    },
    u16,
    128..=1023
}

generate_custom_enum! {
    /// BACnet property identifiers (BACnetPropertyIdentifier)
    PropertyIdentifier {
        AckedTransitions = 0,
        AckRequired = 1,
        Action = 2,
        ActionText = 3,
        ActiveText = 4,
        All = 8,
        NotificationClass = 17,
        ControlledVariableReference = 19,
        ControlledVariableUnits = 20,
        ControlledVariableValue = 21,
        CovIncrement = 22,
        Deadband = 25,
        Description = 28,
        EventEnable = 35,
        EventState = 36,
        EventType = 37,
        FirmwareRevision = 44,
        HighLimit = 45,
        InactiveText = 46,
        LowLimit = 59,
        MaxApduLengthAccepted = 62,
        ModelName = 70,
        ObjectIdentifier = 75,
        ObjectList = 76,
        ObjectName = 77,
        ObjectType = 79,
        OutOfService = 81,
        EventParameters = 83,
        Polarity = 84,
        PresentValue = 85,
        Priority = 86,
        PriorityArray = 87,
        PriorityForWriting = 88,
        ProcessIdentifier = 89,
        ProtocolObjectTypesSupported = 96,
        ProtocolServicesSupported = 97,
        ProtocolVersion = 98,
        Reliability = 103,
        RelinquishDefault = 104,
        SegmentationSupported = 107,
        Setpoint = 108,
        SetpointReference = 109,
        StateText = 110,
        StatusFlags = 111,
        SystemStatus = 112,
        TimeDelay = 113,
        Units = 117,
        VendorIdentifier = 120,
        VendorName = 121,
        LogBuffer = 131,
        NotificationThreshold = 137,
        ProtocolRevision = 139,
        DatabaseRevision = 155,
        DirectReading = 156,
        TrackingValue = 164,
        SlaveProxyEnable = 172,
        InputReference = 181,
        LoggingObject = 183,
        DoorExtendedPulseTime = 227,
        DoorMembers = 228,
        SecuredStatus = 235,
        CredentialDisable = 263,
        UserInformationReference = 311,
        NetworkAccessSecurityPolicies = 332,
        InterfaceValue = 387,
        FaultHighLimit = 388,
        FaultLowLimit = 389,
        StateChangeValues = 396,
        BbmdBroadcastDistributionTable = 414,
        OperationDirection = 477,
        PassengerAlarm = 478,
    },
    u32,
    512..=4194303
}

generate_custom_enum! {
    /// Engineering units (BACnetEngineeringUnits), common subset
    EngineeringUnits {
        SquareMeters = 0,
        Milliamperes = 2,
        Amperes = 3,
        Ohms = 4,
        Volts = 5,
        Kilovolts = 6,
        Joules = 16,
        KilowattHours = 19,
        Hertz = 27,
        PercentRelativeHumidity = 29,
        Watts = 47,
        Kilowatts = 48,
        Pascals = 53,
        Kilopascals = 54,
        Bars = 55,
        DegreesCelsius = 62,
        DegreesKelvin = 63,
        DegreesFahrenheit = 64,
        Seconds = 73,
        MetersPerSecond = 74,
        KilometersPerHour = 75,
        CubicMetersPerSecond = 85,
        NoUnits = 95,
        PartsPerMillion = 96,
        Percent = 98,
        Millivolts = 124,
        LitersPerSecond = 87,
    },
    u32,
    256..=65535
}

generate_custom_enum! {
    /// Binary present value (BACnetBinaryPV)
    BinaryPV {
        Inactive = 0,
        Active = 1,
    },
    u32
}

generate_custom_enum! {
    /// Event state (BACnetEventState)
    EventState {
        Normal = 0,
        Fault = 1,
        Offnormal = 2,
        HighLimit = 3,
        LowLimit = 4,
        LifeSafetyAlarm = 5,
    },
    u32,
    64..=65535
}

generate_custom_enum! {
    /// Event algorithm (BACnetEventType)
    EventType {
        ChangeOfBitstring = 0,
        ChangeOfState = 1,
        ChangeOfValue = 2,
        CommandFailure = 3,
        FloatingLimit = 4,
        OutOfRange = 5,
        ChangeOfLifeSafety = 8,
        Extended = 9,
        BufferReady = 10,
        UnsignedRange = 11,
        AccessEvent = 13,
        DoubleOutOfRange = 14,
        SignedOutOfRange = 15,
        UnsignedOutOfRange = 16,
        ChangeOfCharacterstring = 17,
        ChangeOfStatusFlags = 18,
        ChangeOfReliability = 19,
        None = 20,
        ChangeOfDiscreteValue = 21,
        ChangeOfTimer = 22,
    },
    u32,
    64..=65535
}

generate_custom_enum! {
    /// Door secured status (BACnetDoorSecuredStatus)
    DoorSecuredStatus {
        Secured = 0,
        Unsecured = 1,
        Unknown = 2,
    },
    u32
}

generate_custom_enum! {
    /// Escalator operation direction (BACnetEscalatorOperationDirection)
    EscalatorOperationDirection {
        Unknown = 0,
        Stopped = 1,
        UpRatedSpeed = 2,
        UpReducedSpeed = 3,
        DownRatedSpeed = 4,
        DownReducedSpeed = 5,
    },
    u32,
    1024..=65535
}

generate_custom_enum! {
    /// Credential disable (BACnetAccessCredentialDisable)
    AccessCredentialDisable {
        None = 0,
        Disable = 1,
        DisableManual = 2,
        DisableLockout = 3,
    },
    u32,
    64..=65535
}

generate_custom_enum! {
    /// Network security level (BACnetSecurityLevel)
    SecurityLevel {
        Incapable = 0,
        Plain = 1,
        Signed = 2,
        Encrypted = 3,
        SignedEndToEnd = 4,
        EncryptedEndToEnd = 5,
    },
    u32
}

generate_custom_enum! {
    /// Text message priority (BACnetConfirmedServiceRequestConfirmedTextMessageMessagePriority)
    MessagePriority {
        Normal = 0,
        Urgent = 1,
    },
    u32
}

generate_custom_enum! {
    /// Lighting operation (BACnetLightingOperation)
    LightingOperation {
        None = 0,
        FadeTo = 1,
        RampTo = 2,
        StepUp = 3,
        StepDown = 4,
        StepOn = 5,
        StepOff = 6,
        Warn = 7,
        WarnOff = 8,
        WarnRelinquish = 9,
        Stop = 10,
    },
    u32,
    256..=65535
}

generate_custom_enum! {
    /// Segmentation support (BACnetSegmentation)
    Segmentation {
        SegmentedBoth = 0,
        SegmentedTransmit = 1,
        SegmentedReceive = 2,
        NoSegmentation = 3,
    },
    u32
}

generate_custom_enum! {
    /// Life safety state (BACnetLifeSafetyState)
    LifeSafetyState {
        Quiet = 0,
        PreAlarm = 1,
        Alarm = 2,
        Fault = 3,
        FaultPreAlarm = 4,
        FaultAlarm = 5,
        NotReady = 6,
        Active = 7,
        Tamper = 8,
        TestAlarm = 9,
        TestActive = 10,
        TestFault = 11,
        TestFaultAlarm = 12,
        Holdup = 13,
        Duress = 14,
        TamperAlarm = 15,
        Abnormal = 16,
        EmergencyPower = 17,
        Delayed = 18,
        Blocked = 19,
        LocalAlarm = 20,
        GeneralAlarm = 21,
        Supervisory = 22,
        TestSupervisory = 23,
    },
    u32,
    256..=65535
}

generate_custom_enum! {
    /// Life safety operating mode (BACnetLifeSafetyMode)
    LifeSafetyMode {
        Off = 0,
        On = 1,
        Test = 2,
        Manned = 3,
        Unmanned = 4,
        Armed = 5,
        Disarmed = 6,
        Prearmed = 7,
        Slow = 8,
        Fast = 9,
        Disconnected = 10,
        Enabled = 11,
        Disabled = 12,
        AutomaticReleaseDisabled = 13,
        Default = 14,
    },
    u32,
    256..=65535
}

generate_custom_enum! {
    /// Error class (BACnetErrorClass)
    ErrorClass {
        Device = 0,
        Object = 1,
        Property = 2,
        Resources = 3,
        Security = 4,
        Services = 5,
        Vt = 6,
        Communication = 7,
    },
    u32,
    64..=65535
}

generate_custom_enum! {
    /// Error code (BACnetErrorCode), common subset
    ErrorCode {
        Other = 0,
        ConfigurationInProgress = 2,
        DeviceBusy = 3,
        InconsistentParameters = 7,
        InvalidDataType = 9,
        MissingRequiredParameter = 16,
        NoSpaceForObject = 18,
        ReadAccessDenied = 27,
        Timeout = 30,
        UnknownObject = 31,
        UnknownProperty = 32,
        UnsupportedObjectType = 36,
        ValueOutOfRange = 37,
        WriteAccessDenied = 40,
        InvalidArrayIndex = 42,
        PropertyIsNotAList = 50,
    },
    u32,
    256..=65535
}

generate_custom_enum! {
    /// Vendor identifier (BACnetVendorId), well-known subset
    VendorId {
        Ashrae = 0,
        Nist = 1,
        TheTraneCompany = 2,
        DanielMechanicalInc = 3,
        AlertonInc = 4,
        JohnsonControlsInc = 5,
        SiemensBuildingTechnologies = 7,
        DeltaControlsInc = 8,
        HoneywellInc = 17,
    },
    u32,
    0..=65535
}
